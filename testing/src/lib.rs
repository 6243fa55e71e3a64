//! Shared helpers for unionize tests.

pub use insta::assert_snapshot;
use tracing::Level;

/// Routes trace output of the code under test through the test harness. Safe to call
/// from every test.
pub fn logging() {
    use std::sync::Once;

    static ONCE: Once = Once::new();

    ONCE.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::TRACE)
            .with_test_writer()
            .init();
    });
}
