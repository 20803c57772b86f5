//! Presentation helpers for whatever surface renders the state.
//!
//! Rendering itself lives elsewhere; this module only derives what a surface
//! needs: which actions are currently sensible, a status badge, and a
//! one-line textual summary.

use strive_types::Timestamp;

use crate::state::{ChallengeView, InFlightKey, OpKind, Snapshot};

/// Which operations a surface should offer for one challenge right now.
///
/// A flag goes false while the matching transaction is in flight, so a
/// double click cannot race the advisory guard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Actions {
    pub join: bool,
    pub mark_passed: bool,
    pub settle: bool,
    pub claim: bool,
}

pub fn actions(snapshot: &Snapshot, view: &ChallengeView) -> Actions {
    let id = view.challenge.id;
    let busy = |kind: OpKind| snapshot.is_in_flight(InFlightKey::Op(id, kind));
    let is_creator = view.challenge.creator == snapshot.account;
    let open = !view.challenge.is_settled;
    Actions {
        join: open && view.standing.can_join() && !busy(OpKind::Join),
        mark_passed: open && is_creator && !busy(OpKind::MarkPassed),
        settle: open && is_creator && !busy(OpKind::Settle),
        claim: view.standing.can_claim() && !busy(OpKind::Claim),
    }
}

/// `#3  Daily Coding  by 0x1111…1111  pool 20 ROSE  players 2  [joined]`
pub fn status_line(view: &ChallengeView, now: Timestamp) -> String {
    let c = &view.challenge;
    let mut line = format!(
        "{}  {}  by {}  pool {}  players {}  [{}]",
        c.id,
        c.name,
        c.creator.short(),
        c.pool,
        c.player_count,
        view.standing.as_str(),
    );
    if let Some((start, end)) = c.window {
        if now < start {
            line.push_str(&format!("  opens in {}s", now.elapsed_since(start)));
        } else if now < end && !c.is_settled {
            line.push_str(&format!("  closes in {}s", now.elapsed_since(end)));
        }
    }
    if !view.claimable.is_zero() {
        line.push_str(&format!("  claimable {}", view.claimable));
    }
    line
}
