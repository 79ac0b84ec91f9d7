//! Tests for tracing initialization.

use std::sync::Mutex;

use gradebook_core::tracing::init_tracing;

static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn init_tracing_is_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    init_tracing();
}

#[test]
fn invalid_filter_falls_back_to_default() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("GRADEBOOK_LOG", "=not=a=valid=filter=");
    init_tracing();
    std::env::remove_var("GRADEBOOK_LOG");
}
