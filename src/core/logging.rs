//! Logger initialization
//!
//! Console logging via `pretty_env_logger`. The default level is `info`;
//! `RUST_LOG` overrides it per module as usual.

/// Initialize the process-wide logger.
///
/// Safe to call once at startup, before any other subsystem logs.
pub fn init_logger() {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
