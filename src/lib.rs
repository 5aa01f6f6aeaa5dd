#![no_std]

extern crate alloc;

pub mod config;
pub mod framebuffer;
pub mod ui;

pub use config::UiConfig;

/// Route `log` output through the test harness
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Trace)
        .try_init();
}
