//! Teardown is one-way and idempotent. Lives in its own binary: after
//! teardown the process-wide isolate is unusable for good.

mod common;

use graalfeed::{Error, Isolate};

#[test]
fn teardown_is_one_way() {
    common::setup();
    let isolate = Isolate::instance();
    assert!(isolate.is_live());

    isolate.teardown().expect("teardown");
    assert!(!isolate.is_live());

    // Every operation on the dead isolate reports unavailability.
    assert!(matches!(isolate.attach(), Err(Error::RuntimeUnavailable)));
    assert!(matches!(
        isolate.with_attached(|_, _| Ok(())),
        Err(Error::RuntimeUnavailable)
    ));
    assert!(matches!(
        graalfeed::Endpoint::create(),
        Err(Error::RuntimeUnavailable)
    ));

    // Repeated teardown is a successful no-op.
    isolate.teardown().expect("repeat teardown");

    // Detach on the dead isolate is still a successful no-op.
    isolate.detach().expect("detach after teardown");
}
