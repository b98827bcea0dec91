//! Bidirectional conversion between native tagged records and [`Event`]s.
//!
//! Dispatch is table-driven: [`KIND_OPS`] maps each known discriminator to
//! its `{from, free}` routine pair, so adding an event kind touches one
//! table row plus the kind's own module. The outbound direction dispatches
//! on the [`Event`] variant, which the compiler keeps exhaustive.
//!
//! Ownership: `to_native` and `new_native_list` allocate on the local heap
//! and transfer ownership of the record (and every string it points to) to
//! the caller, who must return it through `free_native` /
//! `free_native_list` of the same kind. Records allocated by the runtime
//! are read with `from_native*` and given back to the runtime, never freed
//! here.

use std::ffi::{c_char, CStr, CString};
use std::ptr;

use tracing::debug;

use super::native::{NativeEvent, NativeEventList};
use super::{Event, EventKind};
use crate::constants::MAX_LIST_LEN;

// =============================================================================
// Dispatch Table
// =============================================================================

struct KindOps {
    kind: EventKind,
    from: unsafe fn(*const NativeEvent) -> Event,
    free: unsafe fn(*mut NativeEvent),
}

/// One row per known discriminator. `Trade` and `TradeEth` share a payload
/// shape and therefore a free routine.
static KIND_OPS: [KindOps; 17] = [
    KindOps {
        kind: EventKind::Quote,
        from: super::Quote::from_native,
        free: super::Quote::free_native,
    },
    KindOps {
        kind: EventKind::Profile,
        from: super::Profile::from_native,
        free: super::Profile::free_native,
    },
    KindOps {
        kind: EventKind::Summary,
        from: super::Summary::from_native,
        free: super::Summary::free_native,
    },
    KindOps {
        kind: EventKind::Greeks,
        from: super::Greeks::from_native,
        free: super::Greeks::free_native,
    },
    KindOps {
        kind: EventKind::Candle,
        from: super::Candle::from_native,
        free: super::Candle::free_native,
    },
    KindOps {
        kind: EventKind::Underlying,
        from: super::Underlying::from_native,
        free: super::Underlying::free_native,
    },
    KindOps {
        kind: EventKind::TheoPrice,
        from: super::TheoPrice::from_native,
        free: super::TheoPrice::free_native,
    },
    KindOps {
        kind: EventKind::Trade,
        from: super::TradeBase::trade_from_native,
        free: super::TradeBase::free_native,
    },
    KindOps {
        kind: EventKind::TradeEth,
        from: super::TradeBase::trade_eth_from_native,
        free: super::TradeBase::free_native,
    },
    KindOps {
        kind: EventKind::Message,
        from: super::Message::from_native,
        free: super::Message::free_native,
    },
    KindOps {
        kind: EventKind::TimeAndSale,
        from: super::TimeAndSale::from_native,
        free: super::TimeAndSale::free_native,
    },
    KindOps {
        kind: EventKind::Order,
        from: super::Order::from_native,
        free: super::Order::free_native,
    },
    KindOps {
        kind: EventKind::AnalyticOrder,
        from: super::AnalyticOrder::from_native,
        free: super::AnalyticOrder::free_native,
    },
    KindOps {
        kind: EventKind::SpreadOrder,
        from: super::SpreadOrder::from_native,
        free: super::SpreadOrder::free_native,
    },
    KindOps {
        kind: EventKind::Series,
        from: super::Series::from_native,
        free: super::Series::free_native,
    },
    KindOps {
        kind: EventKind::OptionSale,
        from: super::OptionSale::from_native,
        free: super::OptionSale::free_native,
    },
    KindOps {
        kind: EventKind::OtcMarketsOrder,
        from: super::OtcMarketsOrder::from_native,
        free: super::OtcMarketsOrder::free_native,
    },
];

fn ops_for(clazz: i32) -> Option<&'static KindOps> {
    KIND_OPS.iter().find(|ops| ops.kind.clazz() == clazz)
}

// =============================================================================
// Record Conversion
// =============================================================================

/// Converts one native record into a local event.
///
/// Returns `None` for a null record or an unrecognized discriminator; the
/// known-tag set grows over time and unknown tags degrade gracefully.
///
/// # Safety
///
/// `raw`, when non-null, must point to a live native event record whose
/// payload matches its `clazz` discriminator.
pub unsafe fn from_native(raw: *const NativeEvent) -> Option<Event> {
    if raw.is_null() {
        return None;
    }

    // The discriminator is read before any payload field.
    let clazz = (*raw).clazz;

    match ops_for(clazz) {
        Some(ops) => Some((ops.from)(raw)),
        None => {
            debug!(clazz, "skipping native event with unknown discriminator");
            None
        }
    }
}

/// Converts every non-null, known-tag element of a native list, in input
/// order. The output may be shorter than `list.size`.
///
/// # Safety
///
/// `list`, when non-null, must point to a live native event list whose
/// `elements` array holds at least `size` entries (null entries allowed).
pub unsafe fn from_native_list(list: *const NativeEventList) -> Vec<Event> {
    if list.is_null() {
        return Vec::new();
    }

    let size = (*list).size;
    if size <= 0 || (*list).elements.is_null() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(size as usize);
    for i in 0..size as usize {
        let element = *(*list).elements.add(i);
        if let Some(event) = from_native(element) {
            result.push(event);
        }
    }
    result
}

/// Allocates a new native record for the event's kind, with independently
/// owned copies of all string fields. Ownership transfers to the caller.
pub fn to_native(event: &Event) -> *mut NativeEvent {
    match event {
        Event::Quote(e) => e.to_native(),
        Event::Profile(e) => e.to_native(),
        Event::Summary(e) => e.to_native(),
        Event::Greeks(e) => e.to_native(),
        Event::Candle(e) => e.to_native(),
        Event::Underlying(e) => e.to_native(),
        Event::TheoPrice(e) => e.to_native(),
        Event::Trade(e) => e.to_native(EventKind::Trade),
        Event::TradeEth(e) => e.to_native(EventKind::TradeEth),
        Event::Message(e) => e.to_native(),
        Event::TimeAndSale(e) => e.to_native(),
        Event::Order(e) => e.to_native(),
        Event::AnalyticOrder(e) => e.to_native(),
        Event::SpreadOrder(e) => e.to_native(),
        Event::Series(e) => e.to_native(),
        Event::OptionSale(e) => e.to_native(),
        Event::OtcMarketsOrder(e) => e.to_native(),
    }
}

/// Frees a record produced by [`to_native`], dispatching on its
/// discriminator to the free routine paired with the fill routine of the
/// same kind. Every owned sub-allocation is released, then the record.
///
/// # Safety
///
/// `raw`, when non-null, must be a record allocated by [`to_native`] that
/// has not been freed before. Freeing twice is undefined.
pub unsafe fn free_native(raw: *mut NativeEvent) {
    if raw.is_null() {
        return;
    }

    let clazz = (*raw).clazz;
    match ops_for(clazz) {
        Some(ops) => (ops.free)(raw),
        None => {
            // No free routine can know this payload's sub-allocations.
            debug!(clazz, "leaking native event with unknown discriminator");
        }
    }
}

// =============================================================================
// List Construction / Destruction
// =============================================================================

/// Allocates a list struct with a zero-initialized element array.
///
/// The requested size is clamped to the range of the native `size`
/// discriminator. A zero-size list carries a null element array.
pub fn new_native_list(size: usize) -> *mut NativeEventList {
    let size = size.min(MAX_LIST_LEN);

    let elements = if size == 0 {
        ptr::null_mut()
    } else {
        let slots = vec![ptr::null_mut::<NativeEvent>(); size];
        Box::into_raw(slots.into_boxed_slice()) as *mut *mut NativeEvent
    };

    Box::into_raw(Box::new(NativeEventList {
        size: size as i32,
        elements,
    }))
}

/// Frees every non-null element via [`free_native`], then the element
/// array, then the list struct. Tolerates partially populated lists.
///
/// # Safety
///
/// `list`, when non-null, must have been allocated by [`new_native_list`]
/// and its non-null elements by [`to_native`]; neither may have been freed
/// before.
pub unsafe fn free_native_list(list: *mut NativeEventList) {
    if list.is_null() {
        return;
    }

    let list = Box::from_raw(list);
    if list.elements.is_null() {
        return;
    }

    let size = list.size.max(0) as usize;
    for i in 0..size {
        free_native(*list.elements.add(i));
    }

    drop(Box::from_raw(ptr::slice_from_raw_parts_mut(
        list.elements,
        size,
    )));
}

// =============================================================================
// String Helpers
// =============================================================================

/// Heap-allocates an independent C copy of `s`. Interior NUL bytes cannot
/// cross the ABI and truncate the copy at the first NUL.
pub(crate) fn alloc_c_string(s: &str) -> *mut c_char {
    let owned = match CString::new(s) {
        Ok(c) => c,
        Err(err) => {
            let end = err.nul_position();
            let mut bytes = err.into_vec();
            bytes.truncate(end);
            // Truncated at the NUL that caused the error, so this cannot fail.
            CString::new(bytes).unwrap_or_default()
        }
    };
    owned.into_raw()
}

/// Copies a native C string into owned local storage; the native memory is
/// never aliased past this call. Null reads as an empty string.
pub(crate) unsafe fn read_c_string(raw: *const c_char) -> String {
    if raw.is_null() {
        return String::new();
    }
    CStr::from_ptr(raw).to_string_lossy().into_owned()
}

/// Releases a string allocated by [`alloc_c_string`]. Null is a no-op.
pub(crate) unsafe fn free_c_string(raw: *mut c_char) {
    if !raw.is_null() {
        drop(CString::from_raw(raw));
    }
}

/// Builds the common record header for an outbound event.
pub(crate) fn header(kind: EventKind, symbol: &str, event_time: i64) -> NativeEvent {
    NativeEvent {
        clazz: kind.clazz(),
        symbol: alloc_c_string(symbol),
        event_time,
    }
}
