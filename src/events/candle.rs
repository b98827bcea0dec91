//! Candle (OHLC aggregation) events.

use super::marshal::{free_c_string, header, read_c_string};
use super::native::{NativeCandle, NativeEvent};
use super::{Event, EventKind};

/// One aggregation period of a candle symbol.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Candle {
    pub symbol: String,
    pub event_time: i64,
    pub event_flags: i32,
    pub index: i64,
    pub count: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub vwap: f64,
    pub bid_volume: f64,
    pub ask_volume: f64,
    pub imp_volatility: f64,
    pub open_interest: i64,
}

impl Candle {
    pub(crate) unsafe fn from_native(raw: *const NativeEvent) -> Event {
        let n = &*(raw as *const NativeCandle);
        Event::Candle(Candle {
            symbol: read_c_string(n.event.symbol),
            event_time: n.event.event_time,
            event_flags: n.event_flags,
            index: n.index,
            count: n.count,
            open: n.open,
            high: n.high,
            low: n.low,
            close: n.close,
            volume: n.volume,
            vwap: n.vwap,
            bid_volume: n.bid_volume,
            ask_volume: n.ask_volume,
            imp_volatility: n.imp_volatility,
            open_interest: n.open_interest,
        })
    }

    pub(crate) fn to_native(&self) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeCandle {
            event: header(EventKind::Candle, &self.symbol, self.event_time),
            event_flags: self.event_flags,
            index: self.index,
            count: self.count,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            vwap: self.vwap,
            bid_volume: self.bid_volume,
            ask_volume: self.ask_volume,
            imp_volatility: self.imp_volatility,
            open_interest: self.open_interest,
        })) as *mut NativeEvent
    }

    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeCandle);
        free_c_string(n.event.symbol);
    }
}
