///
/// TeaScript Runtime Static Library
///
/// Provides all runtime functions needed by AOT-compiled TeaScript programs.
/// This crate produces a static library (libtea_runtime.a) that gets
/// linked with the compiled object file to produce a standalone binary.
///
/// Contains:
/// - Record operations (tea_record_new, tea_record_get, etc.)
/// - Standard stream bindings (tea_println_str, tea_readln, tea_bytes_free, etc.)
/// - Runtime start-up: config discovery and logging (tea_runtime_init)
///

pub mod config;

pub use config::{ConfigError, InputConfig, RuntimeConfig};
pub use tea_std_core::*;
pub use tea_std_io::*;

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. Returns false if one was already installed.
pub fn init_logging(config: &RuntimeConfig) -> bool {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
        .is_ok()
}

/// Apply `config` to the process: logging, the process-wide input decoding,
/// and the calling thread's standard stream bindings. Other threads build
/// their bindings from the same decoding on first use.
pub fn init(config: &RuntimeConfig) {
    init_logging(config);
    if !configure_stdio(config.input.decoding) && stdio_decoding() != config.input.decoding {
        tracing::warn!(
            requested = ?config.input.decoding,
            active = ?stdio_decoding(),
            "input decoding already configured, keeping the active one"
        );
    }
    install_stdio(Io::stdio().with_decoding(stdio_decoding()));
    tracing::debug!(
        log_level = %config.log_level,
        decoding = ?config.input.decoding,
        "runtime initialized"
    );
}

/// Called once from the compiled program's entry point.
/// Returns 1 if the config was loaded, 0 if defaults were used after a config error.
#[unsafe(no_mangle)]
pub extern "C" fn tea_runtime_init() -> i64 {
    match RuntimeConfig::from_env() {
        Ok(config) => {
            init(&config);
            1
        }
        Err(err) => {
            init(&RuntimeConfig::default());
            tracing::warn!(error = %err, "using default runtime config");
            0
        }
    }
}
