//! Thread attachment semantics against the loopback backend.
//!
//! Attach/detach traffic is counted process-wide by the backend, so the
//! whole lifecycle is exercised by a single test: sibling tests running
//! in parallel would make the counter deltas meaningless.

mod common;

use graalfeed::native::loopback;
use graalfeed::Isolate;

#[test]
fn attachment_is_cached_per_thread() {
    common::setup();
    let isolate = Isolate::instance();

    // Repeated attachment from one thread costs one foreign call.
    std::thread::spawn(move || {
        isolate.attach().expect("first attach");
        let after_first = loopback::attach_calls();

        for _ in 0..5 {
            isolate.attach().expect("cached attach");
        }
        isolate
            .with_attached(|outer, _| {
                // Nested entry re-uses the same attachment.
                isolate.with_attached(|inner, _| {
                    assert_eq!(outer.as_ptr(), inner.as_ptr());
                    Ok(())
                })
            })
            .expect("nested with_attached");
        assert_eq!(loopback::attach_calls(), after_first);

        // Detach is observed by the backend; a fresh attach costs again.
        let detaches = loopback::detach_calls();
        isolate.detach().expect("detach");
        assert_eq!(loopback::detach_calls(), detaches + 1);

        isolate.attach().expect("re-attach");
        assert_eq!(loopback::attach_calls(), after_first + 1);
    })
    .join()
    .expect("attach thread panicked");

    // A thread that never attached detaches as a successful no-op, with
    // no foreign traffic.
    std::thread::spawn(move || {
        let detaches = loopback::detach_calls();
        isolate.detach().expect("no-op detach");
        assert_eq!(loopback::detach_calls(), detaches);
    })
    .join()
    .expect("no-op detach thread panicked");

    // Exiting while attached triggers the automatic detach.
    let detaches = loopback::detach_calls();
    std::thread::spawn(move || {
        isolate.attach().expect("attach before exit");
    })
    .join()
    .expect("auto-detach thread panicked");
    assert_eq!(loopback::detach_calls(), detaches + 1);

    // Distinct threads get distinct attachments.
    let first = isolate
        .with_attached(|thread, _| Ok(thread.as_ptr() as usize))
        .expect("main attach");
    let second = std::thread::spawn(move || {
        isolate
            .with_attached(|thread, _| Ok(thread.as_ptr() as usize))
            .expect("worker attach")
    })
    .join()
    .expect("worker thread panicked");
    assert_ne!(first, second);
}
