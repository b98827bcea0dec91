//! Marshalling between local events and native tagged records. Pure
//! conversion tests: no isolate or backend involved.

use std::ptr;

use graalfeed::events::market::{
    AnalyticOrder, Order, OrderBase, OtcMarketsOrder, Profile, Quote, SpreadOrder, Summary,
    TimeAndSale, TradeBase,
};
use graalfeed::events::misc::Message;
use graalfeed::events::native::NativeEvent;
use graalfeed::events::option::{Greeks, OptionSale, Series, TheoPrice, Underlying};
use graalfeed::events::{candle::Candle, marshal};
use graalfeed::{Event, EventKind};

fn sample_events() -> Vec<Event> {
    let base = OrderBase {
        symbol: "ORD".into(),
        event_time: 7,
        index: 42,
        price: 99.5,
        size: 10.0,
        ..OrderBase::default()
    };

    vec![
        Event::Quote(Quote {
            symbol: "QUOTE".into(),
            event_time: 1,
            bid_price: 1.25,
            ask_price: 1.5,
            bid_size: 100.0,
            ask_size: 200.0,
            ..Quote::default()
        }),
        Event::Profile(Profile {
            symbol: "PROF".into(),
            description: "Test Instrument".into(),
            status_reason: "halt".into(),
            beta: 1.1,
            ..Profile::default()
        }),
        Event::Summary(Summary {
            symbol: "SUMM".into(),
            day_open_price: 10.0,
            day_close_price: 11.0,
            open_interest: 5,
            ..Summary::default()
        }),
        Event::Greeks(Greeks {
            symbol: "GRK".into(),
            delta: 0.5,
            gamma: 0.1,
            ..Greeks::default()
        }),
        Event::Candle(Candle {
            symbol: "CNDL".into(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 1000.0,
            ..Candle::default()
        }),
        Event::Underlying(Underlying {
            symbol: "UND".into(),
            volatility: 0.3,
            put_call_ratio: 0.8,
            ..Underlying::default()
        }),
        Event::TheoPrice(TheoPrice {
            symbol: "THEO".into(),
            price: 4.2,
            underlying_price: 100.0,
            ..TheoPrice::default()
        }),
        Event::Trade(TradeBase {
            symbol: "TRD".into(),
            price: 55.5,
            day_volume: 9000.0,
            ..TradeBase::default()
        }),
        Event::TradeEth(TradeBase {
            symbol: "TRDE".into(),
            price: 56.5,
            ..TradeBase::default()
        }),
        Event::Message(Message {
            symbol: "MSG".into(),
            event_time: 3,
            attachment: "{\"k\":\"v\"}".into(),
        }),
        Event::TimeAndSale(TimeAndSale {
            symbol: "TNS".into(),
            price: 12.0,
            exchange_sale_conditions: "@TI".into(),
            buyer: "B".into(),
            seller: "S".into(),
            ..TimeAndSale::default()
        }),
        Event::Order(Order {
            base: base.clone(),
            market_maker: "NSDQ".into(),
        }),
        Event::AnalyticOrder(AnalyticOrder {
            order: Order {
                base: base.clone(),
                market_maker: "ARCA".into(),
            },
            iceberg_peak_size: 5.0,
            ..AnalyticOrder::default()
        }),
        Event::SpreadOrder(SpreadOrder {
            base: base.clone(),
            spread_symbol: "SPREAD".into(),
        }),
        Event::Series(Series {
            symbol: "SER".into(),
            expiration: 20260918,
            forward_price: 101.0,
            ..Series::default()
        }),
        Event::OptionSale(OptionSale {
            symbol: "OPTS".into(),
            option_symbol: ".OPTS260918C100".into(),
            underlying_price: 100.5,
            ..OptionSale::default()
        }),
        Event::OtcMarketsOrder(OtcMarketsOrder {
            order: Order {
                base,
                market_maker: "OTCM".into(),
            },
            quote_access_payment: 1,
            otc_markets_flags: 2,
        }),
    ]
}

#[test]
fn round_trip_preserves_every_kind() {
    for event in sample_events() {
        let raw = marshal::to_native(&event);
        assert!(!raw.is_null());

        let back = unsafe { marshal::from_native(raw) };
        assert_eq!(back.as_ref(), Some(&event), "kind {:?}", event.kind());

        unsafe { marshal::free_native(raw) };
    }
}

#[test]
fn quote_round_trip_preserves_book_fields() {
    let quote = Event::Quote(Quote {
        symbol: "TEST1".into(),
        bid_price: 10.1,
        ask_price: 10.2,
        ..Quote::default()
    });

    let raw = marshal::to_native(&quote);
    let back = unsafe { marshal::from_native(raw) }.expect("known discriminator");
    unsafe { marshal::free_native(raw) };

    let Event::Quote(q) = back else {
        panic!("quote came back as {:?}", back.kind());
    };
    assert_eq!(q.symbol, "TEST1");
    assert_eq!(q.bid_price, 10.1);
    assert_eq!(q.ask_price, 10.2);
}

#[test]
fn discriminators_match_the_runtime_table() {
    let expected = [
        (EventKind::Quote, 0),
        (EventKind::Profile, 1),
        (EventKind::Summary, 2),
        (EventKind::Greeks, 3),
        (EventKind::Candle, 4),
        (EventKind::Underlying, 6),
        (EventKind::TheoPrice, 7),
        (EventKind::Trade, 8),
        (EventKind::TradeEth, 9),
        (EventKind::Message, 11),
        (EventKind::TimeAndSale, 12),
        (EventKind::Order, 14),
        (EventKind::AnalyticOrder, 15),
        (EventKind::SpreadOrder, 16),
        (EventKind::Series, 17),
        (EventKind::OptionSale, 18),
        (EventKind::OtcMarketsOrder, 19),
    ];

    assert_eq!(EventKind::ALL.len(), expected.len());
    for (kind, clazz) in expected {
        assert_eq!(kind.clazz(), clazz);
        assert_eq!(EventKind::from_clazz(clazz), Some(kind));
    }
    for gap in [5, 10, 13, -1, 20] {
        assert_eq!(EventKind::from_clazz(gap), None);
    }
}

#[test]
fn marshalled_record_carries_the_kind_discriminator() {
    for event in sample_events() {
        let raw = marshal::to_native(&event);
        assert_eq!(unsafe { (*raw).clazz }, event.kind().clazz());
        unsafe { marshal::free_native(raw) };
    }
}

#[test]
fn null_record_reads_as_none() {
    assert_eq!(unsafe { marshal::from_native(ptr::null()) }, None);
    // Null free is a no-op, not a crash.
    unsafe { marshal::free_native(ptr::null_mut()) };
}

#[test]
fn unknown_discriminator_is_skipped() {
    let unknown = NativeEvent {
        clazz: 5,
        symbol: ptr::null_mut(),
        event_time: 0,
    };
    assert_eq!(unsafe { marshal::from_native(&unknown) }, None);
}

#[test]
fn list_conversion_skips_unknown_and_null_preserving_order() {
    let quote = Event::Quote(Quote {
        symbol: "FIRST".into(),
        ..Quote::default()
    });
    let trade = Event::Trade(TradeBase {
        symbol: "LAST".into(),
        ..TradeBase::default()
    });
    let mut unknown = NativeEvent {
        clazz: 13,
        symbol: ptr::null_mut(),
        event_time: 0,
    };

    let list = marshal::new_native_list(4);
    unsafe {
        *(*list).elements.add(0) = marshal::to_native(&quote);
        *(*list).elements.add(1) = &mut unknown;
        // Slot 2 stays null.
        *(*list).elements.add(3) = marshal::to_native(&trade);
    }

    let events = unsafe { marshal::from_native_list(list) };
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].symbol(), "FIRST");
    assert_eq!(events[1].symbol(), "LAST");

    // Unknown-tag elements are left alone by the list free; detach the
    // stack-owned record before handing the list back.
    unsafe {
        *(*list).elements.add(1) = ptr::null_mut();
        marshal::free_native_list(list);
    }
}

#[test]
fn empty_and_partial_lists_are_tolerated() {
    assert!(unsafe { marshal::from_native_list(ptr::null()) }.is_empty());

    let empty = marshal::new_native_list(0);
    unsafe {
        assert_eq!((*empty).size, 0);
        assert!((*empty).elements.is_null());
        assert!(marshal::from_native_list(empty).is_empty());
        marshal::free_native_list(empty);
    }

    // A list freed before every slot was populated.
    let partial = marshal::new_native_list(3);
    unsafe {
        *(*partial).elements.add(0) = marshal::to_native(&Event::Quote(Quote::default()));
        marshal::free_native_list(partial);
    }
}

#[test]
fn interior_nul_truncates_marshalled_strings() {
    let quote = Event::Quote(Quote {
        symbol: "AB\0CD".into(),
        ..Quote::default()
    });

    let raw = marshal::to_native(&quote);
    let back = unsafe { marshal::from_native(raw) }.expect("known discriminator");
    unsafe { marshal::free_native(raw) };

    assert_eq!(back.symbol(), "AB");
}
