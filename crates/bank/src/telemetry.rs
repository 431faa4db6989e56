use crate::config::BankConfig;
use tracing::Level;

/// Installs a global `fmt` subscriber at `level` with RFC 3339 local timestamps.
///
/// Returns `false` when a subscriber was already installed, so callers such
/// as test harnesses can invoke it more than once.
pub fn init(level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .try_init()
        .is_ok()
}

/// Installs the subscriber at the level read into `config.log_level`.
pub fn init_from(config: &BankConfig) -> bool {
    init(config.log_level)
}
