//! Tracing subscriber setup

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Installs a global subscriber filtered by `RUST_LOG`, defaulting to `info`
///
/// Fails if a global subscriber is already set.
pub fn init_tracing() -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    install(filter)
}

/// Installs a global subscriber with an explicit filter directive such as
/// `"persondir=debug"`
pub fn init_tracing_with_filter(directives: &str) -> Result<(), TryInitError> {
    install(EnvFilter::new(directives))
}

fn install(filter: EnvFilter) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        // whichever call wins, the later one must report the existing subscriber
        let _ = init_tracing_with_filter("persondir=debug");
        assert!(init_tracing().is_err());
    }
}
