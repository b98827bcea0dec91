//! Native tagged-record layouts for event marshalling.
//!
//! Every record starts with a [`NativeEvent`] header whose `clazz` field
//! discriminates the payload shape. A pointer to any concrete record may be
//! viewed as `*mut NativeEvent`; the discriminator must be read before any
//! payload field is touched. String fields are independently heap-allocated
//! C strings owned by the record; whichever side allocates a record frees it
//! through the free routine matched to its discriminator.

use std::ffi::c_char;

/// Common header of every native event record.
///
/// `clazz` selects the payload shape. `symbol` and `event_time` are shared
/// by all known shapes, so they live in the header rather than per payload.
#[repr(C)]
pub struct NativeEvent {
    pub clazz: i32,
    pub symbol: *mut c_char,
    pub event_time: i64,
}

/// A count plus an array of pointers to native event records.
///
/// `elements` may be null only when `size == 0`. Iteration must bound by
/// `size` and null-check each element: the array may be sparse while a list
/// is under construction.
#[repr(C)]
pub struct NativeEventList {
    pub size: i32,
    pub elements: *mut *mut NativeEvent,
}

// =============================================================================
// Market Event Payloads
// =============================================================================

#[repr(C)]
pub struct NativeQuote {
    pub event: NativeEvent,
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

/// Shared by the `Trade` and `TradeEth` discriminators.
#[repr(C)]
pub struct NativeTrade {
    pub event: NativeEvent,
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

#[repr(C)]
pub struct NativeSummary {
    pub event: NativeEvent,
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

#[repr(C)]
pub struct NativeProfile {
    pub event: NativeEvent,
    pub description: *mut c_char,
    pub status_reason: *mut c_char,
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

#[repr(C)]
pub struct NativeTimeAndSale {
    pub event: NativeEvent,
    pub event_flags: i32,
    pub index: i64,
    pub time_nano_part: i32,
    pub exchange_code: i16,
    pub price: f64,
    pub size: f64,
    pub bid_price: f64,
    pub ask_price: f64,
    pub exchange_sale_conditions: *mut c_char,
    pub flags: i32,
    pub buyer: *mut c_char,
    pub seller: *mut c_char,
}

// =============================================================================
// Order Family Payloads
// =============================================================================

/// Common prefix of every order-shaped record.
#[repr(C)]
pub struct NativeOrderBase {
    pub event: NativeEvent,
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

#[repr(C)]
pub struct NativeOrder {
    pub base: NativeOrderBase,
    pub market_maker: *mut c_char,
}

#[repr(C)]
pub struct NativeAnalyticOrder {
    pub order: NativeOrder,
    pub iceberg_peak_size: f64,
    pub iceberg_hidden_size: f64,
    pub iceberg_executed_size: f64,
    pub iceberg_flags: i32,
}

#[repr(C)]
pub struct NativeOtcMarketsOrder {
    pub order: NativeOrder,
    pub quote_access_payment: i32,
    pub otc_markets_flags: i32,
}

#[repr(C)]
pub struct NativeSpreadOrder {
    pub base: NativeOrderBase,
    pub spread_symbol: *mut c_char,
}

// =============================================================================
// Option Event Payloads
// =============================================================================

#[repr(C)]
pub struct NativeGreeks {
    pub event: NativeEvent,
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

#[repr(C)]
pub struct NativeTheoPrice {
    pub event: NativeEvent,
    pub event_flags: i32,
    pub index: i64,
    pub price: f64,
    pub underlying_price: f64,
    pub delta: f64,
    pub gamma: f64,
    pub dividend: f64,
    pub interest: f64,
}

#[repr(C)]
pub struct NativeUnderlying {
    pub event: NativeEvent,
    pub event_flags: i32,
    pub index: i64,
    pub volatility: f64,
    pub front_volatility: f64,
    pub back_volatility: f64,
    pub call_volume: f64,
    pub put_volume: f64,
    pub put_call_ratio: f64,
}

#[repr(C)]
pub struct NativeSeries {
    pub event: NativeEvent,
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

#[repr(C)]
pub struct NativeOptionSale {
    pub event: NativeEvent,
    pub event_flags: i32,
    pub index: i64,
    pub time_sequence: i64,
    pub time_nano_part: i32,
    pub exchange_code: i16,
    pub price: f64,
    pub size: f64,
    pub bid_price: f64,
    pub ask_price: f64,
    pub exchange_sale_conditions: *mut c_char,
    pub flags: i32,
    pub underlying_price: f64,
    pub volatility: f64,
    pub delta: f64,
    pub option_symbol: *mut c_char,
}

// =============================================================================
// Candle / Misc Payloads
// =============================================================================

#[repr(C)]
pub struct NativeCandle {
    pub event: NativeEvent,
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

#[repr(C)]
pub struct NativeMessage {
    pub event: NativeEvent,
    pub attachment: *mut c_char,
}
