//! Market event types: quotes, trades, summaries, profiles and the order
//! family.
//!
//! Each type carries its own `from_native` / `to_native` / `free_native`
//! triple. A record produced by one kind's `to_native` must only ever be
//! freed by the same kind's `free_native`; the pairing is enforced by the
//! dispatch table in [`super::marshal`].

use super::marshal::{alloc_c_string, free_c_string, header, read_c_string};
use super::native::{
    NativeAnalyticOrder, NativeEvent, NativeOrder, NativeOrderBase, NativeOtcMarketsOrder,
    NativeProfile, NativeQuote, NativeSpreadOrder, NativeSummary, NativeTimeAndSale, NativeTrade,
};
use super::{Event, EventKind};

/// Best bid and offer for a symbol.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Quote {
    pub symbol: String,
    pub event_time: i64,
    pub time_millis_sequence: i32,
    pub time_nano_part: i32,
    pub bid_time: i64,
    pub bid_exchange_code: i16,
    pub bid_price: f64,
    pub bid_size: f64,
    pub ask_time: i64,
    pub ask_exchange_code: i16,
    pub ask_price: f64,
    pub ask_size: f64,
}

impl Quote {
    pub(crate) unsafe fn from_native(raw: *const NativeEvent) -> Event {
        let n = &*(raw as *const NativeQuote);
        Event::Quote(Quote {
            symbol: read_c_string(n.event.symbol),
            event_time: n.event.event_time,
            time_millis_sequence: n.time_millis_sequence,
            time_nano_part: n.time_nano_part,
            bid_time: n.bid_time,
            bid_exchange_code: n.bid_exchange_code,
            bid_price: n.bid_price,
            bid_size: n.bid_size,
            ask_time: n.ask_time,
            ask_exchange_code: n.ask_exchange_code,
            ask_price: n.ask_price,
            ask_size: n.ask_size,
        })
    }

    pub(crate) fn to_native(&self) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeQuote {
            event: header(EventKind::Quote, &self.symbol, self.event_time),
            time_millis_sequence: self.time_millis_sequence,
            time_nano_part: self.time_nano_part,
            bid_time: self.bid_time,
            bid_exchange_code: self.bid_exchange_code,
            bid_price: self.bid_price,
            bid_size: self.bid_size,
            ask_time: self.ask_time,
            ask_exchange_code: self.ask_exchange_code,
            ask_price: self.ask_price,
            ask_size: self.ask_size,
        })) as *mut NativeEvent
    }

    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeQuote);
        free_c_string(n.event.symbol);
    }
}

/// Last trade and daily totals; shared by the `Trade` and `TradeEth` kinds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TradeBase {
    pub symbol: String,
    pub event_time: i64,
    pub time_sequence: i64,
    pub time_nano_part: i32,
    pub exchange_code: i16,
    pub price: f64,
    pub change: f64,
    pub size: f64,
    pub day_id: i32,
    pub day_volume: f64,
    pub day_turnover: f64,
    pub flags: i32,
}

impl TradeBase {
    unsafe fn read(raw: *const NativeEvent) -> TradeBase {
        let n = &*(raw as *const NativeTrade);
        TradeBase {
            symbol: read_c_string(n.event.symbol),
            event_time: n.event.event_time,
            time_sequence: n.time_sequence,
            time_nano_part: n.time_nano_part,
            exchange_code: n.exchange_code,
            price: n.price,
            change: n.change,
            size: n.size,
            day_id: n.day_id,
            day_volume: n.day_volume,
            day_turnover: n.day_turnover,
            flags: n.flags,
        }
    }

    pub(crate) unsafe fn trade_from_native(raw: *const NativeEvent) -> Event {
        Event::Trade(TradeBase::read(raw))
    }

    pub(crate) unsafe fn trade_eth_from_native(raw: *const NativeEvent) -> Event {
        Event::TradeEth(TradeBase::read(raw))
    }

    pub(crate) fn to_native(&self, kind: EventKind) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeTrade {
            event: header(kind, &self.symbol, self.event_time),
            time_sequence: self.time_sequence,
            time_nano_part: self.time_nano_part,
            exchange_code: self.exchange_code,
            price: self.price,
            change: self.change,
            size: self.size,
            day_id: self.day_id,
            day_volume: self.day_volume,
            day_turnover: self.day_turnover,
            flags: self.flags,
        })) as *mut NativeEvent
    }

    // One free routine serves both trade discriminators: the payload shape
    // is identical.
    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeTrade);
        free_c_string(n.event.symbol);
    }
}

/// Open/high/low/close summary of a trading day.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub symbol: String,
    pub event_time: i64,
    pub day_id: i32,
    pub day_open_price: f64,
    pub day_high_price: f64,
    pub day_low_price: f64,
    pub day_close_price: f64,
    pub prev_day_id: i32,
    pub prev_day_close_price: f64,
    pub prev_day_volume: f64,
    pub open_interest: i64,
    pub flags: i32,
}

impl Summary {
    pub(crate) unsafe fn from_native(raw: *const NativeEvent) -> Event {
        let n = &*(raw as *const NativeSummary);
        Event::Summary(Summary {
            symbol: read_c_string(n.event.symbol),
            event_time: n.event.event_time,
            day_id: n.day_id,
            day_open_price: n.day_open_price,
            day_high_price: n.day_high_price,
            day_low_price: n.day_low_price,
            day_close_price: n.day_close_price,
            prev_day_id: n.prev_day_id,
            prev_day_close_price: n.prev_day_close_price,
            prev_day_volume: n.prev_day_volume,
            open_interest: n.open_interest,
            flags: n.flags,
        })
    }

    pub(crate) fn to_native(&self) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeSummary {
            event: header(EventKind::Summary, &self.symbol, self.event_time),
            day_id: self.day_id,
            day_open_price: self.day_open_price,
            day_high_price: self.day_high_price,
            day_low_price: self.day_low_price,
            day_close_price: self.day_close_price,
            prev_day_id: self.prev_day_id,
            prev_day_close_price: self.prev_day_close_price,
            prev_day_volume: self.prev_day_volume,
            open_interest: self.open_interest,
            flags: self.flags,
        })) as *mut NativeEvent
    }

    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeSummary);
        free_c_string(n.event.symbol);
    }
}

/// Instrument description and trading status.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Profile {
    pub symbol: String,
    pub event_time: i64,
    pub description: String,
    pub status_reason: String,
    pub halt_start_time: i64,
    pub halt_end_time: i64,
    pub high_limit_price: f64,
    pub low_limit_price: f64,
    pub high_52_week_price: f64,
    pub low_52_week_price: f64,
    pub beta: f64,
    pub earnings_per_share: f64,
    pub dividend_frequency: f64,
    pub ex_dividend_amount: f64,
    pub ex_dividend_day_id: i32,
    pub shares: f64,
    pub free_float: f64,
    pub flags: i32,
}

impl Profile {
    pub(crate) unsafe fn from_native(raw: *const NativeEvent) -> Event {
        let n = &*(raw as *const NativeProfile);
        Event::Profile(Profile {
            symbol: read_c_string(n.event.symbol),
            event_time: n.event.event_time,
            description: read_c_string(n.description),
            status_reason: read_c_string(n.status_reason),
            halt_start_time: n.halt_start_time,
            halt_end_time: n.halt_end_time,
            high_limit_price: n.high_limit_price,
            low_limit_price: n.low_limit_price,
            high_52_week_price: n.high_52_week_price,
            low_52_week_price: n.low_52_week_price,
            beta: n.beta,
            earnings_per_share: n.earnings_per_share,
            dividend_frequency: n.dividend_frequency,
            ex_dividend_amount: n.ex_dividend_amount,
            ex_dividend_day_id: n.ex_dividend_day_id,
            shares: n.shares,
            free_float: n.free_float,
            flags: n.flags,
        })
    }

    pub(crate) fn to_native(&self) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeProfile {
            event: header(EventKind::Profile, &self.symbol, self.event_time),
            description: alloc_c_string(&self.description),
            status_reason: alloc_c_string(&self.status_reason),
            halt_start_time: self.halt_start_time,
            halt_end_time: self.halt_end_time,
            high_limit_price: self.high_limit_price,
            low_limit_price: self.low_limit_price,
            high_52_week_price: self.high_52_week_price,
            low_52_week_price: self.low_52_week_price,
            beta: self.beta,
            earnings_per_share: self.earnings_per_share,
            dividend_frequency: self.dividend_frequency,
            ex_dividend_amount: self.ex_dividend_amount,
            ex_dividend_day_id: self.ex_dividend_day_id,
            shares: self.shares,
            free_float: self.free_float,
            flags: self.flags,
        })) as *mut NativeEvent
    }

    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeProfile);
        free_c_string(n.event.symbol);
        free_c_string(n.description);
        free_c_string(n.status_reason);
    }
}

/// An individual trade print with sale conditions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeAndSale {
    pub symbol: String,
    pub event_time: i64,
    pub event_flags: i32,
    pub index: i64,
    pub time_nano_part: i32,
    pub exchange_code: i16,
    pub price: f64,
    pub size: f64,
    pub bid_price: f64,
    pub ask_price: f64,
    pub exchange_sale_conditions: String,
    pub flags: i32,
    pub buyer: String,
    pub seller: String,
}

impl TimeAndSale {
    pub(crate) unsafe fn from_native(raw: *const NativeEvent) -> Event {
        let n = &*(raw as *const NativeTimeAndSale);
        Event::TimeAndSale(TimeAndSale {
            symbol: read_c_string(n.event.symbol),
            event_time: n.event.event_time,
            event_flags: n.event_flags,
            index: n.index,
            time_nano_part: n.time_nano_part,
            exchange_code: n.exchange_code,
            price: n.price,
            size: n.size,
            bid_price: n.bid_price,
            ask_price: n.ask_price,
            exchange_sale_conditions: read_c_string(n.exchange_sale_conditions),
            flags: n.flags,
            buyer: read_c_string(n.buyer),
            seller: read_c_string(n.seller),
        })
    }

    pub(crate) fn to_native(&self) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeTimeAndSale {
            event: header(EventKind::TimeAndSale, &self.symbol, self.event_time),
            event_flags: self.event_flags,
            index: self.index,
            time_nano_part: self.time_nano_part,
            exchange_code: self.exchange_code,
            price: self.price,
            size: self.size,
            bid_price: self.bid_price,
            ask_price: self.ask_price,
            exchange_sale_conditions: alloc_c_string(&self.exchange_sale_conditions),
            flags: self.flags,
            buyer: alloc_c_string(&self.buyer),
            seller: alloc_c_string(&self.seller),
        })) as *mut NativeEvent
    }

    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeTimeAndSale);
        free_c_string(n.event.symbol);
        free_c_string(n.exchange_sale_conditions);
        free_c_string(n.buyer);
        free_c_string(n.seller);
    }
}

// =============================================================================
// Order Family
// =============================================================================

/// Fields common to every order-shaped event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderBase {
    pub symbol: String,
    pub event_time: i64,
    pub event_flags: i32,
    pub index: i64,
    pub time_sequence: i64,
    pub time_nano_part: i32,
    pub action_time: i64,
    pub order_id: i64,
    pub aux_order_id: i64,
    pub price: f64,
    pub size: f64,
    pub executed_size: f64,
    pub count: i64,
    pub flags: i32,
    pub trade_id: i64,
    pub trade_price: f64,
    pub trade_size: f64,
}

impl OrderBase {
    unsafe fn read(raw: *const NativeOrderBase) -> OrderBase {
        let n = &*raw;
        OrderBase {
            symbol: read_c_string(n.event.symbol),
            event_time: n.event.event_time,
            event_flags: n.event_flags,
            index: n.index,
            time_sequence: n.time_sequence,
            time_nano_part: n.time_nano_part,
            action_time: n.action_time,
            order_id: n.order_id,
            aux_order_id: n.aux_order_id,
            price: n.price,
            size: n.size,
            executed_size: n.executed_size,
            count: n.count,
            flags: n.flags,
            trade_id: n.trade_id,
            trade_price: n.trade_price,
            trade_size: n.trade_size,
        }
    }

    fn write(&self, kind: EventKind) -> NativeOrderBase {
        NativeOrderBase {
            event: header(kind, &self.symbol, self.event_time),
            event_flags: self.event_flags,
            index: self.index,
            time_sequence: self.time_sequence,
            time_nano_part: self.time_nano_part,
            action_time: self.action_time,
            order_id: self.order_id,
            aux_order_id: self.aux_order_id,
            price: self.price,
            size: self.size,
            executed_size: self.executed_size,
            count: self.count,
            flags: self.flags,
            trade_id: self.trade_id,
            trade_price: self.trade_price,
            trade_size: self.trade_size,
        }
    }
}

/// An order book entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Order {
    pub base: OrderBase,
    pub market_maker: String,
}

impl Order {
    pub(crate) unsafe fn from_native(raw: *const NativeEvent) -> Event {
        let n = &*(raw as *const NativeOrder);
        Event::Order(Order {
            base: OrderBase::read(&n.base),
            market_maker: read_c_string(n.market_maker),
        })
    }

    pub(crate) fn to_native(&self) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeOrder {
            base: self.base.write(EventKind::Order),
            market_maker: alloc_c_string(&self.market_maker),
        })) as *mut NativeEvent
    }

    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeOrder);
        free_c_string(n.base.event.symbol);
        free_c_string(n.market_maker);
    }
}

/// An order enriched with iceberg analytics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalyticOrder {
    pub order: Order,
    pub iceberg_peak_size: f64,
    pub iceberg_hidden_size: f64,
    pub iceberg_executed_size: f64,
    pub iceberg_flags: i32,
}

impl AnalyticOrder {
    pub(crate) unsafe fn from_native(raw: *const NativeEvent) -> Event {
        let n = &*(raw as *const NativeAnalyticOrder);
        Event::AnalyticOrder(AnalyticOrder {
            order: Order {
                base: OrderBase::read(&n.order.base),
                market_maker: read_c_string(n.order.market_maker),
            },
            iceberg_peak_size: n.iceberg_peak_size,
            iceberg_hidden_size: n.iceberg_hidden_size,
            iceberg_executed_size: n.iceberg_executed_size,
            iceberg_flags: n.iceberg_flags,
        })
    }

    pub(crate) fn to_native(&self) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeAnalyticOrder {
            order: NativeOrder {
                base: self.order.base.write(EventKind::AnalyticOrder),
                market_maker: alloc_c_string(&self.order.market_maker),
            },
            iceberg_peak_size: self.iceberg_peak_size,
            iceberg_hidden_size: self.iceberg_hidden_size,
            iceberg_executed_size: self.iceberg_executed_size,
            iceberg_flags: self.iceberg_flags,
        })) as *mut NativeEvent
    }

    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeAnalyticOrder);
        free_c_string(n.order.base.event.symbol);
        free_c_string(n.order.market_maker);
    }
}

/// An order carrying OTC Markets quote metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OtcMarketsOrder {
    pub order: Order,
    pub quote_access_payment: i32,
    pub otc_markets_flags: i32,
}

impl OtcMarketsOrder {
    pub(crate) unsafe fn from_native(raw: *const NativeEvent) -> Event {
        let n = &*(raw as *const NativeOtcMarketsOrder);
        Event::OtcMarketsOrder(OtcMarketsOrder {
            order: Order {
                base: OrderBase::read(&n.order.base),
                market_maker: read_c_string(n.order.market_maker),
            },
            quote_access_payment: n.quote_access_payment,
            otc_markets_flags: n.otc_markets_flags,
        })
    }

    pub(crate) fn to_native(&self) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeOtcMarketsOrder {
            order: NativeOrder {
                base: self.order.base.write(EventKind::OtcMarketsOrder),
                market_maker: alloc_c_string(&self.order.market_maker),
            },
            quote_access_payment: self.quote_access_payment,
            otc_markets_flags: self.otc_markets_flags,
        })) as *mut NativeEvent
    }

    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeOtcMarketsOrder);
        free_c_string(n.order.base.event.symbol);
        free_c_string(n.order.market_maker);
    }
}

/// An order for a multi-leg spread instrument.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpreadOrder {
    pub base: OrderBase,
    pub spread_symbol: String,
}

impl SpreadOrder {
    pub(crate) unsafe fn from_native(raw: *const NativeEvent) -> Event {
        let n = &*(raw as *const NativeSpreadOrder);
        Event::SpreadOrder(SpreadOrder {
            base: OrderBase::read(&n.base),
            spread_symbol: read_c_string(n.spread_symbol),
        })
    }

    pub(crate) fn to_native(&self) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeSpreadOrder {
            base: self.base.write(EventKind::SpreadOrder),
            spread_symbol: alloc_c_string(&self.spread_symbol),
        })) as *mut NativeEvent
    }

    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeSpreadOrder);
        free_c_string(n.base.event.symbol);
        free_c_string(n.spread_symbol);
    }
}
