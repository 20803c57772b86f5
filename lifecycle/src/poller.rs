//! Cancellable polling.
//!
//! `Poller` owns one spawned task that runs a tick callback on an interval
//! until the callback reports a terminal outcome or the poller is cancelled.
//! Dropping the poller cancels it, so a forgotten handle never leaks a
//! background task.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use strive_chain::ChainClient;
use strive_types::ChallengeId;
use tokio::sync::{watch, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::client::LifecycleClient;

/// What a poll tick decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    Continue,
    /// Stop polling; the watched condition is final.
    Terminal,
}

/// A scheduled task with an explicit off switch.
pub struct Poller {
    handle: Option<JoinHandle<()>>,
    cancel: watch::Sender<bool>,
}

impl Poller {
    /// Run `tick` every `interval` until it returns [`PollOutcome::Terminal`]
    /// or the poller is cancelled. The first tick fires immediately.
    pub fn spawn<F, Fut>(interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = PollOutcome> + Send,
    {
        let (cancel, mut cancelled) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        if tick().await == PollOutcome::Terminal {
                            break;
                        }
                    }
                    _ = cancelled.changed() => break,
                }
            }
        });
        Self {
            handle: Some(handle),
            cancel,
        }
    }

    /// Stop the poller. Idempotent.
    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Wait for the polling task to stop.
    pub async fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        let _ = self.cancel.send(true);
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// A lifecycle client shareable between callers and background pollers.
pub struct SharedLifecycleClient<C>(Arc<Mutex<LifecycleClient<C>>>);

impl<C> Clone for SharedLifecycleClient<C> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<C: ChainClient + 'static> SharedLifecycleClient<C> {
    pub fn new(client: LifecycleClient<C>) -> Self {
        Self(Arc::new(Mutex::new(client)))
    }

    pub async fn lock(&self) -> MutexGuard<'_, LifecycleClient<C>> {
        self.0.lock().await
    }

    /// Refresh one challenge on an interval until it settles.
    ///
    /// Transient errors keep the poller alive; only settlement stops it.
    pub fn watch_until_settled(&self, id: ChallengeId, interval: Duration) -> Poller {
        let shared = self.clone();
        Poller::spawn(interval, move || {
            let shared = shared.clone();
            async move {
                let mut client = shared.lock().await;
                if let Err(err) = client.refresh(Some(id)).await {
                    warn!(%id, error = %err, "poll refresh failed");
                    return PollOutcome::Continue;
                }
                match client.challenge(id) {
                    Some(view) if view.challenge.is_settled => PollOutcome::Terminal,
                    _ => PollOutcome::Continue,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use strive_abi::ChallengePlatform;
    use strive_nullables::NullChain;
    use strive_types::StakeAmount;

    #[tokio::test]
    async fn poller_stops_on_terminal() {
        let ticks = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&ticks);
        let poller = Poller::spawn(Duration::from_millis(1), move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) >= 2 {
                    PollOutcome::Terminal
                } else {
                    PollOutcome::Continue
                }
            }
        });
        poller.join().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn cancel_stops_the_task() {
        let poller = Poller::spawn(Duration::from_secs(3600), || async {
            PollOutcome::Continue
        });
        poller.cancel();
        poller.join().await;
    }

    #[tokio::test]
    async fn watch_until_settled_terminates_on_settlement() {
        let chain = NullChain::new(StakeAmount::from_tokens(1));
        let settle_chain = chain.for_sender(chain.sender());
        let client =
            LifecycleClient::connect(chain, ChallengePlatform::new(NullChain::PLATFORM))
                .await
                .unwrap();
        let shared = SharedLifecycleClient::new(client);

        let id = shared.lock().await.create("watched", None).await.unwrap();
        let poller = shared.watch_until_settled(id, Duration::from_millis(1));

        // Settle out-of-band; the poller should notice and stop.
        let mut settler = LifecycleClient::connect(
            settle_chain,
            ChallengePlatform::new(NullChain::PLATFORM),
        )
        .await
        .unwrap();
        settler.settle(id).await.unwrap();

        poller.join().await;
        let client = shared.lock().await;
        assert!(client.challenge(id).unwrap().challenge.is_settled);
    }
}
