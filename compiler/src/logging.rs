//! Logging setup for overscope
//!
//! The library only emits through the `log` facade; binaries and tests pick
//! the backend here (`env_logger`).
//!
//! Levels used:
//!
//! - `warn!` - degraded inputs that still produce a result
//! - `info!` - hierarchy loading progress
//! - `debug!` - scope construction
//! - `trace!` - every overridden member reported during a walk
//!
//! ```bash
//! RUST_LOG=debug overscope overridden hierarchy.toml Child.run
//! RUST_LOG=overscope_compiler::tast::overrides=trace overscope overridden hierarchy.toml Child.run
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging with sensible defaults (Warn level).
///
/// This only initializes once; subsequent calls are no-ops.
pub fn init() {
    init_with_level(LevelFilter::Warn);
}

/// Initialize logging with a specific level.
///
/// `RUST_LOG` still refines the filter when set.
pub fn init_with_level(level: LevelFilter) {
    INIT.call_once(|| {
        Builder::new()
            .filter_level(level)
            .parse_default_env()
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{:5}] {} - {}",
                    record.level(),
                    record.target(),
                    record.args()
                )
            })
            .init();
    });
}

/// Initialize logging from the RUST_LOG environment variable.
///
/// If RUST_LOG is not set, defaults to Warn level.
pub fn init_from_env() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    });
}

/// Initialize logging for tests.
///
/// Output is captured by the test harness; safe to call from every test.
pub fn init_test() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .is_test(true)
        .try_init();
}

pub fn is_initialized() -> bool {
    INIT.is_completed()
}
