//! Domain event types and the tagged-record marshalling layer.
//!
//! The feed runtime exchanges events as flat, tag-discriminated native
//! records ([`native::NativeEvent`]). This module owns the closed set of
//! known discriminators ([`EventKind`]), the local polymorphic event type
//! ([`Event`]) and the bidirectional conversion between the two
//! ([`marshal`]).
//!
//! The set of discriminators the runtime emits grows over time; a record
//! with an unrecognized tag is skipped during conversion, never an error.

pub mod candle;
pub mod market;
pub mod marshal;
pub mod misc;
pub mod native;
pub mod option;

pub use candle::Candle;
pub use market::{
    AnalyticOrder, Order, OrderBase, OtcMarketsOrder, Profile, Quote, SpreadOrder, Summary,
    TimeAndSale, TradeBase,
};
pub use misc::Message;
pub use option::{Greeks, OptionSale, Series, TheoPrice, Underlying};

/// Discriminator of a native event record.
///
/// Values mirror the runtime's event class table. Gaps in the numbering
/// (5, 10, 13) are shapes the runtime defines but this bridge does not
/// consume; records carrying them fall into the unknown-tag path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum EventKind {
    Quote = 0,
    Profile = 1,
    Summary = 2,
    Greeks = 3,
    Candle = 4,
    Underlying = 6,
    TheoPrice = 7,
    Trade = 8,
    TradeEth = 9,
    Message = 11,
    TimeAndSale = 12,
    Order = 14,
    AnalyticOrder = 15,
    SpreadOrder = 16,
    Series = 17,
    OptionSale = 18,
    OtcMarketsOrder = 19,
}

impl EventKind {
    /// All known discriminators, in tag order.
    pub const ALL: [EventKind; 17] = [
        EventKind::Quote,
        EventKind::Profile,
        EventKind::Summary,
        EventKind::Greeks,
        EventKind::Candle,
        EventKind::Underlying,
        EventKind::TheoPrice,
        EventKind::Trade,
        EventKind::TradeEth,
        EventKind::Message,
        EventKind::TimeAndSale,
        EventKind::Order,
        EventKind::AnalyticOrder,
        EventKind::SpreadOrder,
        EventKind::Series,
        EventKind::OptionSale,
        EventKind::OtcMarketsOrder,
    ];

    /// The native discriminator value.
    pub fn clazz(self) -> i32 {
        self as i32
    }

    /// Maps a native discriminator back to a known kind, if any.
    pub fn from_clazz(clazz: i32) -> Option<EventKind> {
        EventKind::ALL.into_iter().find(|k| k.clazz() == clazz)
    }
}

/// A single event received from or destined for the feed runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Quote(Quote),
    Profile(Profile),
    Summary(Summary),
    Greeks(Greeks),
    Candle(Candle),
    Underlying(Underlying),
    TheoPrice(TheoPrice),
    Trade(TradeBase),
    TradeEth(TradeBase),
    Message(Message),
    TimeAndSale(TimeAndSale),
    Order(Order),
    AnalyticOrder(AnalyticOrder),
    SpreadOrder(SpreadOrder),
    Series(Series),
    OptionSale(OptionSale),
    OtcMarketsOrder(OtcMarketsOrder),
}

impl Event {
    /// The discriminator this event marshals to.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Quote(_) => EventKind::Quote,
            Event::Profile(_) => EventKind::Profile,
            Event::Summary(_) => EventKind::Summary,
            Event::Greeks(_) => EventKind::Greeks,
            Event::Candle(_) => EventKind::Candle,
            Event::Underlying(_) => EventKind::Underlying,
            Event::TheoPrice(_) => EventKind::TheoPrice,
            Event::Trade(_) => EventKind::Trade,
            Event::TradeEth(_) => EventKind::TradeEth,
            Event::Message(_) => EventKind::Message,
            Event::TimeAndSale(_) => EventKind::TimeAndSale,
            Event::Order(_) => EventKind::Order,
            Event::AnalyticOrder(_) => EventKind::AnalyticOrder,
            Event::SpreadOrder(_) => EventKind::SpreadOrder,
            Event::Series(_) => EventKind::Series,
            Event::OptionSale(_) => EventKind::OptionSale,
            Event::OtcMarketsOrder(_) => EventKind::OtcMarketsOrder,
        }
    }

    /// The event symbol.
    pub fn symbol(&self) -> &str {
        match self {
            Event::Quote(e) => &e.symbol,
            Event::Profile(e) => &e.symbol,
            Event::Summary(e) => &e.symbol,
            Event::Greeks(e) => &e.symbol,
            Event::Candle(e) => &e.symbol,
            Event::Underlying(e) => &e.symbol,
            Event::TheoPrice(e) => &e.symbol,
            Event::Trade(e) | Event::TradeEth(e) => &e.symbol,
            Event::Message(e) => &e.symbol,
            Event::TimeAndSale(e) => &e.symbol,
            Event::Order(e) => &e.base.symbol,
            Event::AnalyticOrder(e) => &e.order.base.symbol,
            Event::SpreadOrder(e) => &e.base.symbol,
            Event::Series(e) => &e.symbol,
            Event::OptionSale(e) => &e.symbol,
            Event::OtcMarketsOrder(e) => &e.order.base.symbol,
        }
    }
}
