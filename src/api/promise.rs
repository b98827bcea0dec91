//! Promises for single-event requests.

use std::time::Instant;

use crate::constants::PROMISE_POLL_INTERVAL;
use crate::error::Result;
use crate::events::{marshal, Event};
use crate::exception::check_pending;
use crate::handle::{kind, ObjectHandle};
use crate::isolate::Isolate;
use crate::native::abi::ObjectPtr;

/// A pending request for one event, resolved by the runtime.
///
/// The result record is runtime-owned: [`try_result`] copies it into an
/// [`Event`] and immediately returns the record to the runtime. An
/// unclaimed result is reclaimed when the promise handle drops.
///
/// [`try_result`]: EventPromise::try_result
#[derive(Clone, Debug)]
pub struct EventPromise {
    handle: ObjectHandle<kind::Promise>,
}

impl EventPromise {
    pub(crate) fn from_ptr(ptr: ObjectPtr) -> EventPromise {
        EventPromise {
            handle: ObjectHandle::new(ptr),
        }
    }

    /// Whether the runtime has resolved this promise.
    pub fn is_done(&self) -> Result<bool> {
        Isolate::instance().with_attached(|thread, api| {
            let ptr = self.handle.require("promise_is_done")?;
            // SAFETY: live promise pointer.
            let done = unsafe { (api.promise_is_done)(thread.as_ptr(), ptr) };
            check_pending(api, thread)?;
            Ok(done != 0)
        })
    }

    /// Claims the result if one is ready. `None` when still pending or
    /// when the promise resolved without an event.
    pub fn try_result(&self) -> Result<Option<Event>> {
        Isolate::instance().with_attached(|thread, api| {
            let ptr = self.handle.require("promise_get_result")?;
            // SAFETY: live promise pointer.
            let raw = unsafe { (api.promise_get_result)(thread.as_ptr(), ptr) };
            if raw.is_null() {
                check_pending(api, thread)?;
                return Ok(None);
            }

            // SAFETY: a non-null result is a live runtime-owned record;
            // it is copied out and handed straight back.
            let event = unsafe { marshal::from_native(raw) };
            // SAFETY: the record was claimed above and is released once.
            unsafe { (api.event_release)(thread.as_ptr(), raw) };
            Ok(event)
        })
    }

    /// Polls until the promise resolves or `timeout` elapses. `None` on
    /// timeout or a resolved-empty promise.
    pub fn result_timeout(&self, timeout: std::time::Duration) -> Result<Option<Event>> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.is_done()? {
                return self.try_result();
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            std::thread::sleep(PROMISE_POLL_INTERVAL);
        }
    }
}
