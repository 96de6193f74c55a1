#![allow(dead_code)]

mod mocks;
pub mod records;

#[allow(unused_imports)]
pub use mocks::{MockFile, MockSource};

/// Routes `log` output to the test harness; safe to call from every test.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
