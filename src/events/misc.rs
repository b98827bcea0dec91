//! Application message events.

use super::marshal::{alloc_c_string, free_c_string, header, read_c_string};
use super::native::{NativeEvent, NativeMessage};
use super::{Event, EventKind};

/// A free-form application message with an opaque serialized attachment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Message {
    pub symbol: String,
    pub event_time: i64,
    pub attachment: String,
}

impl Message {
    pub(crate) unsafe fn from_native(raw: *const NativeEvent) -> Event {
        let n = &*(raw as *const NativeMessage);
        Event::Message(Message {
            symbol: read_c_string(n.event.symbol),
            event_time: n.event.event_time,
            attachment: read_c_string(n.attachment),
        })
    }

    pub(crate) fn to_native(&self) -> *mut NativeEvent {
        Box::into_raw(Box::new(NativeMessage {
            event: header(EventKind::Message, &self.symbol, self.event_time),
            attachment: alloc_c_string(&self.attachment),
        })) as *mut NativeEvent
    }

    pub(crate) unsafe fn free_native(raw: *mut NativeEvent) {
        let n = Box::from_raw(raw as *mut NativeMessage);
        free_c_string(n.event.symbol);
        free_c_string(n.attachment);
    }
}
