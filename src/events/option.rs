//! Option analytics events: greeks, theoretical prices, underlyings,
//! series and option sales.

use super::marshal::{alloc_c_string, free_c_string, header, read_c_string};
use super::native::{
    NativeEvent, NativeGreeks, NativeOptionSale, NativeSeries, NativeTheoPrice, NativeUnderlying,
};
use super::{Event, EventKind};

/// Option greeks snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Greeks {
    pub symbol: String,
    pub event_time: i64,
    pub event_flags: i32,
    pub index: i64,
    pub price: f64,
    pub volatility: f64,
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub rho: f64,
    pub vega: f64,
}

impl Greeks {
    pub(crate) unsafe fn from_native(raw: *const NativeEvent) -> Event {
        let n = &*(raw as *const NativeGreeks);
        Event::Greeks(Greeks {
            symbol: read_c_string(n.event.symbol),
            event_time: n.event.event_time,
            event_flags: n.event_flags,
            index: n.index,
            price: n.price,
            volatility: n.volatility,
            delta: n.delta,
            gamma: n.gamma,
            theta: n.theta,
            rho: n.rho,
            vega: n.vega,
        })
    }

    pub(crate) fn to_native(&self) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeGreeks {
            event: header(EventKind::Greeks, &self.symbol, self.event_time),
            event_flags: self.event_flags,
            index: self.index,
            price: self.price,
            volatility: self.volatility,
            delta: self.delta,
            gamma: self.gamma,
            theta: self.theta,
            rho: self.rho,
            vega: self.vega,
        })) as *mut NativeEvent
    }

    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeGreeks);
        free_c_string(n.event.symbol);
    }
}

/// Theoretical option price snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TheoPrice {
    pub symbol: String,
    pub event_time: i64,
    pub event_flags: i32,
    pub index: i64,
    pub price: f64,
    pub underlying_price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub dividend: f64,
    pub interest: f64,
}

impl TheoPrice {
    pub(crate) unsafe fn from_native(raw: *const NativeEvent) -> Event {
        let n = &*(raw as *const NativeTheoPrice);
        Event::TheoPrice(TheoPrice {
            symbol: read_c_string(n.event.symbol),
            event_time: n.event.event_time,
            event_flags: n.event_flags,
            index: n.index,
            price: n.price,
            underlying_price: n.underlying_price,
            delta: n.delta,
            gamma: n.gamma,
            dividend: n.dividend,
            interest: n.interest,
        })
    }

    pub(crate) fn to_native(&self) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeTheoPrice {
            event: header(EventKind::TheoPrice, &self.symbol, self.event_time),
            event_flags: self.event_flags,
            index: self.index,
            price: self.price,
            underlying_price: self.underlying_price,
            delta: self.delta,
            gamma: self.gamma,
            dividend: self.dividend,
            interest: self.interest,
        })) as *mut NativeEvent
    }

    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeTheoPrice);
        free_c_string(n.event.symbol);
    }
}

/// Volatility view of an option's underlying instrument.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Underlying {
    pub symbol: String,
    pub event_time: i64,
    pub event_flags: i32,
    pub index: i64,
    pub volatility: f64,
    pub front_volatility: f64,
    pub back_volatility: f64,
    pub call_volume: f64,
    pub put_volume: f64,
    pub put_call_ratio: f64,
}

impl Underlying {
    pub(crate) unsafe fn from_native(raw: *const NativeEvent) -> Event {
        let n = &*(raw as *const NativeUnderlying);
        Event::Underlying(Underlying {
            symbol: read_c_string(n.event.symbol),
            event_time: n.event.event_time,
            event_flags: n.event_flags,
            index: n.index,
            volatility: n.volatility,
            front_volatility: n.front_volatility,
            back_volatility: n.back_volatility,
            call_volume: n.call_volume,
            put_volume: n.put_volume,
            put_call_ratio: n.put_call_ratio,
        })
    }

    pub(crate) fn to_native(&self) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeUnderlying {
            event: header(EventKind::Underlying, &self.symbol, self.event_time),
            event_flags: self.event_flags,
            index: self.index,
            volatility: self.volatility,
            front_volatility: self.front_volatility,
            back_volatility: self.back_volatility,
            call_volume: self.call_volume,
            put_volume: self.put_volume,
            put_call_ratio: self.put_call_ratio,
        })) as *mut NativeEvent
    }

    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeUnderlying);
        free_c_string(n.event.symbol);
    }
}

/// Per-expiration option series totals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    pub symbol: String,
    pub event_time: i64,
    pub event_flags: i32,
    pub index: i64,
    pub time_sequence: i64,
    pub expiration: i32,
    pub volatility: f64,
    pub call_volume: f64,
    pub put_volume: f64,
    pub put_call_ratio: f64,
    pub forward_price: f64,
    pub dividend: f64,
    pub interest: f64,
}

impl Series {
    pub(crate) unsafe fn from_native(raw: *const NativeEvent) -> Event {
        let n = &*(raw as *const NativeSeries);
        Event::Series(Series {
            symbol: read_c_string(n.event.symbol),
            event_time: n.event.event_time,
            event_flags: n.event_flags,
            index: n.index,
            time_sequence: n.time_sequence,
            expiration: n.expiration,
            volatility: n.volatility,
            call_volume: n.call_volume,
            put_volume: n.put_volume,
            put_call_ratio: n.put_call_ratio,
            forward_price: n.forward_price,
            dividend: n.dividend,
            interest: n.interest,
        })
    }

    pub(crate) fn to_native(&self) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeSeries {
            event: header(EventKind::Series, &self.symbol, self.event_time),
            event_flags: self.event_flags,
            index: self.index,
            time_sequence: self.time_sequence,
            expiration: self.expiration,
            volatility: self.volatility,
            call_volume: self.call_volume,
            put_volume: self.put_volume,
            put_call_ratio: self.put_call_ratio,
            forward_price: self.forward_price,
            dividend: self.dividend,
            interest: self.interest,
        })) as *mut NativeEvent
    }

    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeSeries);
        free_c_string(n.event.symbol);
    }
}

/// A sale of an option contract, with its underlying context.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionSale {
    pub symbol: String,
    pub event_time: i64,
    pub event_flags: i32,
    pub index: i64,
    pub time_sequence: i64,
    pub time_nano_part: i32,
    pub exchange_code: i16,
    pub price: f64,
    pub size: f64,
    pub bid_price: f64,
    pub ask_price: f64,
    pub exchange_sale_conditions: String,
    pub flags: i32,
    pub underlying_price: f64,
    pub volatility: f64,
    pub delta: f64,
    pub option_symbol: String,
}

impl OptionSale {
    pub(crate) unsafe fn from_native(raw: *const NativeEvent) -> Event {
        let n = &*(raw as *const NativeOptionSale);
        Event::OptionSale(OptionSale {
            symbol: read_c_string(n.event.symbol),
            event_time: n.event.event_time,
            event_flags: n.event_flags,
            index: n.index,
            time_sequence: n.time_sequence,
            time_nano_part: n.time_nano_part,
            exchange_code: n.exchange_code,
            price: n.price,
            size: n.size,
            bid_price: n.bid_price,
            ask_price: n.ask_price,
            exchange_sale_conditions: read_c_string(n.exchange_sale_conditions),
            flags: n.flags,
            underlying_price: n.underlying_price,
            volatility: n.volatility,
            delta: n.delta,
            option_symbol: read_c_string(n.option_symbol),
        })
    }

    pub(crate) fn to_native(&self) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeOptionSale {
            event: header(EventKind::OptionSale, &self.symbol, self.event_time),
            event_flags: self.event_flags,
            index: self.index,
            time_sequence: self.time_sequence,
            time_nano_part: self.time_nano_part,
            exchange_code: self.exchange_code,
            price: self.price,
            size: self.size,
            bid_price: self.bid_price,
            ask_price: self.ask_price,
            exchange_sale_conditions: alloc_c_string(&self.exchange_sale_conditions),
            flags: self.flags,
            underlying_price: self.underlying_price,
            volatility: self.volatility,
            delta: self.delta,
            option_symbol: alloc_c_string(&self.option_symbol),
        })) as *mut NativeEvent
    }

    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeOptionSale);
        free_c_string(n.event.symbol);
        free_c_string(n.exchange_sale_conditions);
        free_c_string(n.option_symbol);
    }
}
