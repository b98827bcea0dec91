//! The publisher (producing side) of an endpoint.

use tracing::debug;

use crate::error::Result;
use crate::events::{marshal, Event};
use crate::exception::expect_success;
use crate::handle::{kind, ObjectHandle};
use crate::isolate::Isolate;
use crate::native::abi::ObjectPtr;

/// The event-producing side of an endpoint.
#[derive(Clone, Debug)]
pub struct Publisher {
    handle: ObjectHandle<kind::Publisher>,
}

impl Publisher {
    pub(crate) fn from_ptr(ptr: ObjectPtr) -> Publisher {
        Publisher {
            handle: ObjectHandle::new(ptr),
        }
    }

    /// Publishes a batch of events.
    ///
    /// The events are marshalled into a native list for the duration of
    /// the call; the runtime copies what it needs and the list is freed
    /// here regardless of the outcome. An empty batch is a no-op.
    pub fn publish(&self, events: &[Event]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        Isolate::instance().with_attached(|thread, api| {
            let ptr = self.handle.require("publisher_publish_events")?;

            let list = marshal::new_native_list(events.len());
            for (i, event) in events.iter().enumerate() {
                // SAFETY: `list` was just allocated with `events.len()`
                // slots; each slot is written once.
                unsafe {
                    *(*list).elements.add(i) = marshal::to_native(event);
                }
            }

            // SAFETY: live publisher pointer; the list and its elements
            // stay alive across the call.
            let status =
                unsafe { (api.publisher_publish_events)(thread.as_ptr(), ptr, list) };
            let outcome = expect_success(api, thread, status, "gfeed_publisher_publish_events");

            // SAFETY: the list and every element were allocated above and
            // are freed exactly once, pass or fail.
            unsafe { marshal::free_native_list(list) };

            debug!(count = events.len(), ok = outcome.is_ok(), "events published");
            outcome
        })
    }
}
