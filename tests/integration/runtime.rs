use std::sync::Arc;
use std::time::Duration;

use ripple_core::Error;
use ripple_runtime::Runtime;

#[test]
fn unregistered_scheme_is_reported_as_no_provider() {
    let err = Runtime::new("memq://localhost").unwrap_err();
    assert!(matches!(err, Error::NoProvider(scheme) if scheme == "memq"));
}

#[test]
fn empty_url_resolves_through_the_default_udpm_provider() {
    // Port 0 asks the kernel for an ephemeral port so the test doesn't
    // collide with another process already bound to the real default.
    match Runtime::new("udpm://239.255.76.67:0") {
        Ok(_) => {}
        Err(e) => panic!("default provider should always resolve: {e}"),
    }
}

#[tokio::test]
async fn timed_handle_returns_false_on_timeout_with_nothing_published() {
    let runtime = Arc::new(Runtime::new("udpm://239.255.76.67:0").unwrap());
    let handled = runtime.timed_handle(Duration::from_millis(50)).await.unwrap();
    assert!(!handled, "no datagram was sent, so handle should time out");
}
