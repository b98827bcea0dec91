//! The pending-exception bridge: failures planted on the foreign side
//! surface as typed errors and leave the slot clear.

mod common;

use graalfeed::native::loopback;
use graalfeed::{get_property, set_property, Error};

#[test]
fn pending_exception_surfaces_with_diagnostics() {
    common::setup();

    loopback::raise("IllegalStateException", "boom", "at X");

    // The property is unset, so the call reports the planted exception.
    let err = get_property("exception_tests.unset").expect_err("planted exception");
    let Error::ForeignException {
        message,
        class_name,
        stack_trace,
    } = err
    else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(message, "boom");
    assert_eq!(class_name, "IllegalStateException");
    assert_eq!(stack_trace, "at X");

    // Draining cleared the slot: the same call now succeeds.
    assert_eq!(get_property("exception_tests.unset").expect("clear slot"), None);
}

#[test]
fn exception_slot_is_per_thread() {
    common::setup();

    loopback::raise("IllegalArgumentException", "wrong thread", "");

    // Another thread's slot is untouched.
    std::thread::spawn(|| {
        assert_eq!(
            get_property("exception_tests.other").expect("no exception here"),
            None
        );
    })
    .join()
    .expect("worker panicked");

    // This thread still owes its exception.
    let err = get_property("exception_tests.other").expect_err("still pending");
    assert!(matches!(err, Error::ForeignException { .. }));
}

#[test]
fn successful_calls_leave_no_residue() {
    common::setup();

    set_property("exception_tests.key", "value").expect("set");
    assert_eq!(
        get_property("exception_tests.key").expect("get"),
        Some("value".into())
    );
    assert_eq!(get_property("exception_tests.missing").expect("get"), None);
}
