//! The feed (consuming side) and its subscriptions.

use tracing::debug;

use crate::error::Result;
use crate::events::EventKind;
use crate::exception::{expect_non_null, expect_success};
use crate::handle::{kind, ObjectHandle};
use crate::isolate::Isolate;
use crate::native::abi::ObjectPtr;

use super::{c_string, EventPromise};

/// The event-consuming side of an endpoint.
#[derive(Clone, Debug)]
pub struct Feed {
    handle: ObjectHandle<kind::Feed>,
}

impl Feed {
    pub(crate) fn from_ptr(ptr: ObjectPtr) -> Feed {
        Feed {
            handle: ObjectHandle::new(ptr),
        }
    }

    /// Creates a subscription for events of one kind. Symbols are added
    /// separately.
    pub fn create_subscription(&self, event_kind: EventKind) -> Result<Subscription> {
        Isolate::instance().with_attached(|thread, api| {
            let ptr = self.handle.require("feed_create_subscription")?;
            // SAFETY: live feed pointer.
            let sub =
                unsafe { (api.feed_create_subscription)(thread.as_ptr(), ptr, event_kind.clazz()) };
            let sub = expect_non_null(api, thread, sub, "gfeed_feed_create_subscription")?;
            debug!(?event_kind, "subscription created");
            Ok(Subscription {
                handle: ObjectHandle::new(sub),
            })
        })
    }

    /// Requests the last known event of `event_kind` for `symbol`. The
    /// result is delivered asynchronously through the returned promise.
    pub fn last_event_promise(&self, event_kind: EventKind, symbol: &str) -> Result<EventPromise> {
        let symbol_c = c_string(symbol);
        Isolate::instance().with_attached(|thread, api| {
            let ptr = self.handle.require("feed_get_last_event_promise")?;
            // SAFETY: live feed pointer; the symbol buffer outlives the call.
            let promise = unsafe {
                (api.feed_get_last_event_promise)(
                    thread.as_ptr(),
                    ptr,
                    event_kind.clazz(),
                    symbol_c.as_ptr(),
                )
            };
            let promise =
                expect_non_null(api, thread, promise, "gfeed_feed_get_last_event_promise")?;
            Ok(EventPromise::from_ptr(promise))
        })
    }
}

/// A symbol subscription on a feed.
#[derive(Clone, Debug)]
pub struct Subscription {
    handle: ObjectHandle<kind::Subscription>,
}

impl Subscription {
    /// Starts delivering events for `symbol`.
    pub fn add_symbol(&self, symbol: &str) -> Result<()> {
        let symbol_c = c_string(symbol);
        Isolate::instance().with_attached(|thread, api| {
            let ptr = self.handle.require("subscription_add_symbol")?;
            // SAFETY: live subscription pointer; the symbol buffer outlives
            // the call.
            let status =
                unsafe { (api.subscription_add_symbol)(thread.as_ptr(), ptr, symbol_c.as_ptr()) };
            expect_success(api, thread, status, "gfeed_subscription_add_symbol")
        })
    }

    /// Adds every symbol in order, stopping at the first failure.
    pub fn add_symbols<I, S>(&self, symbols: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for symbol in symbols {
            self.add_symbol(symbol.as_ref())?;
        }
        Ok(())
    }

    /// Stops delivering events for `symbol`.
    pub fn remove_symbol(&self, symbol: &str) -> Result<()> {
        let symbol_c = c_string(symbol);
        Isolate::instance().with_attached(|thread, api| {
            let ptr = self.handle.require("subscription_remove_symbol")?;
            // SAFETY: live subscription pointer; the symbol buffer outlives
            // the call.
            let status = unsafe {
                (api.subscription_remove_symbol)(thread.as_ptr(), ptr, symbol_c.as_ptr())
            };
            expect_success(api, thread, status, "gfeed_subscription_remove_symbol")
        })
    }

    /// Stops all delivery on this subscription.
    pub fn close(&self) -> Result<()> {
        Isolate::instance().with_attached(|thread, api| {
            let ptr = self.handle.require("subscription_close")?;
            // SAFETY: live subscription pointer.
            let status = unsafe { (api.subscription_close)(thread.as_ptr(), ptr) };
            expect_success(api, thread, status, "gfeed_subscription_close")
        })
    }
}
