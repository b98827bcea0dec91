//! End-to-end flows through the public API against the loopback backend.

mod common;

use std::time::Duration;

use graalfeed::events::market::Quote;
use graalfeed::events::misc::Message;
use graalfeed::native::loopback;
use graalfeed::{Endpoint, Event, EventKind};

#[test]
fn endpoint_lifecycle() {
    common::setup();

    let endpoint = Endpoint::create().expect("create");
    endpoint.connect("demo.host:7300").expect("connect");
    endpoint.disconnect().expect("disconnect");
    endpoint.connect("demo.host:7300").expect("reconnect");
    endpoint.close().expect("close");
}

#[test]
fn subscription_flow() {
    common::setup();

    let endpoint = Endpoint::create().expect("create");
    let feed = endpoint.feed().expect("feed");
    let subscription = feed
        .create_subscription(EventKind::Quote)
        .expect("subscription");

    subscription.add_symbol("AAPL").expect("add");
    subscription
        .add_symbols(["MSFT", "GOOG", "AMZN"])
        .expect("add batch");
    subscription.remove_symbol("MSFT").expect("remove");
    subscription.close().expect("close");
}

#[test]
fn last_event_promise_resolves_for_quotes() {
    common::setup();

    let endpoint = Endpoint::create().expect("create");
    let feed = endpoint.feed().expect("feed");

    let promise = feed
        .last_event_promise(EventKind::Quote, "TEST1")
        .expect("promise");
    assert!(promise.is_done().expect("is_done"));

    let event = promise
        .result_timeout(Duration::from_secs(1))
        .expect("result")
        .expect("resolved event");
    assert_eq!(event.kind(), EventKind::Quote);
    assert_eq!(event.symbol(), "TEST1");

    // The result was claimed; a second read finds nothing.
    assert_eq!(promise.try_result().expect("second read"), None);
}

#[test]
fn unresolved_promise_times_out_empty() {
    common::setup();

    let endpoint = Endpoint::create().expect("create");
    let feed = endpoint.feed().expect("feed");

    // The backend never resolves non-quote promises.
    let promise = feed
        .last_event_promise(EventKind::Trade, "TEST1")
        .expect("promise");
    assert!(!promise.is_done().expect("is_done"));
    assert_eq!(
        promise
            .result_timeout(Duration::from_millis(20))
            .expect("timeout path"),
        None
    );
}

#[test]
fn publishing_marshals_the_whole_batch() {
    common::setup();

    let endpoint = Endpoint::create().expect("create");
    let publisher = endpoint.publisher().expect("publisher");

    let before = loopback::published_events();
    publisher
        .publish(&[
            Event::Quote(Quote {
                symbol: "PUB1".into(),
                bid_price: 10.1,
                ask_price: 10.2,
                ..Quote::default()
            }),
            Event::Quote(Quote {
                symbol: "PUB2".into(),
                ..Quote::default()
            }),
            Event::Message(Message {
                symbol: "PUB3".into(),
                event_time: 0,
                attachment: "hello".into(),
            }),
        ])
        .expect("publish");
    assert_eq!(loopback::published_events(), before + 3);

    // Empty batches never reach the backend.
    let before = loopback::published_events();
    publisher.publish(&[]).expect("empty publish");
    assert_eq!(loopback::published_events(), before);
}

#[test]
fn handles_are_shareable_across_threads() {
    common::setup();

    let endpoint = Endpoint::create().expect("create");
    let feed = endpoint.feed().expect("feed");

    let worker_feed = feed.clone();
    std::thread::spawn(move || {
        let subscription = worker_feed
            .create_subscription(EventKind::TimeAndSale)
            .expect("subscription on worker");
        subscription.add_symbol("IBM").expect("add on worker");
    })
    .join()
    .expect("worker panicked");

    // The clone's drop on the worker did not invalidate this handle.
    feed.create_subscription(EventKind::Candle)
        .expect("subscription after worker");
}
