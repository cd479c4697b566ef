//! One-shot `env_logger` setup for the binary, benches and tests

use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

/// Guards logger installation
static INIT: Once = Once::new();

/// Installs the global logger once.
///
/// Defaults to `info` for the library and `warn` elsewhere; binaries and tests raise or
/// lower their own targets through `RUST_LOG`.
/// Calling it again, or after another logger was installed, is a no-op.
pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Warn)
            .filter_module("chaintable", LevelFilter::Info)
            .format_timestamp_millis()
            .parse_default_env();

        let _ = builder.try_init();
    });
}
