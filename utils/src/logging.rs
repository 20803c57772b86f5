//! Structured logging initialization via `tracing`.

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset: chatter from the strive crates
/// at info, everything else at warn.
const DEFAULT_FILTER: &str = "warn,strive=info,strive_lifecycle=info,strive_chain=info";

/// Initialize the tracing subscriber.
///
/// `RUST_LOG`, when set, overrides the default filter entirely.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .init();
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_directives_parse() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
