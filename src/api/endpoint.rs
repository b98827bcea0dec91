//! The endpoint: connection root of the feed runtime.

use tracing::info;

use crate::error::Result;
use crate::exception::{expect_non_null, expect_success};
use crate::handle::{kind, ObjectHandle};
use crate::isolate::Isolate;

use super::{c_string, Feed, Publisher};

/// A feed endpoint. Connects to an address, and hands out the feed
/// (consuming) and publisher (producing) sides.
///
/// Cloning shares the underlying runtime object; the object is released
/// when the last clone drops. [`close`](Endpoint::close) tears the
/// connection down eagerly without waiting for the drop.
#[derive(Clone, Debug)]
pub struct Endpoint {
    handle: ObjectHandle<kind::Endpoint>,
}

impl Endpoint {
    /// Creates a new, unconnected endpoint.
    pub fn create() -> Result<Endpoint> {
        Isolate::instance().with_attached(|thread, api| {
            // SAFETY: the thread handle is this thread's live attachment.
            let ptr = unsafe { (api.endpoint_create)(thread.as_ptr()) };
            let ptr = expect_non_null(api, thread, ptr, "gfeed_endpoint_create")?;
            Ok(Endpoint {
                handle: ObjectHandle::new(ptr),
            })
        })
    }

    /// Connects to `address` (for example `demo.host:7300` or a file URI).
    pub fn connect(&self, address: &str) -> Result<()> {
        let address_c = c_string(address);
        Isolate::instance().with_attached(|thread, api| {
            let ptr = self.handle.require("endpoint_connect")?;
            // SAFETY: the endpoint pointer is live while `self` exists and
            // the address buffer outlives the call.
            let status =
                unsafe { (api.endpoint_connect)(thread.as_ptr(), ptr, address_c.as_ptr()) };
            expect_success(api, thread, status, "gfeed_endpoint_connect")?;
            info!(address, "endpoint connected");
            Ok(())
        })
    }

    /// Disconnects without destroying the endpoint; it may reconnect.
    pub fn disconnect(&self) -> Result<()> {
        Isolate::instance().with_attached(|thread, api| {
            let ptr = self.handle.require("endpoint_disconnect")?;
            // SAFETY: live endpoint pointer.
            let status = unsafe { (api.endpoint_disconnect)(thread.as_ptr(), ptr) };
            expect_success(api, thread, status, "gfeed_endpoint_disconnect")
        })
    }

    /// Closes the endpoint for good. The handle stays valid for release
    /// but further operations on the runtime object will fail there.
    pub fn close(&self) -> Result<()> {
        Isolate::instance().with_attached(|thread, api| {
            let ptr = self.handle.require("endpoint_close")?;
            // SAFETY: live endpoint pointer.
            let status = unsafe { (api.endpoint_close)(thread.as_ptr(), ptr) };
            expect_success(api, thread, status, "gfeed_endpoint_close")?;
            info!("endpoint closed");
            Ok(())
        })
    }

    /// The consuming side of this endpoint.
    pub fn feed(&self) -> Result<Feed> {
        Isolate::instance().with_attached(|thread, api| {
            let ptr = self.handle.require("endpoint_get_feed")?;
            // SAFETY: live endpoint pointer.
            let feed = unsafe { (api.endpoint_get_feed)(thread.as_ptr(), ptr) };
            let feed = expect_non_null(api, thread, feed, "gfeed_endpoint_get_feed")?;
            Ok(Feed::from_ptr(feed))
        })
    }

    /// The producing side of this endpoint.
    pub fn publisher(&self) -> Result<Publisher> {
        Isolate::instance().with_attached(|thread, api| {
            let ptr = self.handle.require("endpoint_get_publisher")?;
            // SAFETY: live endpoint pointer.
            let publisher = unsafe { (api.endpoint_get_publisher)(thread.as_ptr(), ptr) };
            let publisher =
                expect_non_null(api, thread, publisher, "gfeed_endpoint_get_publisher")?;
            Ok(Publisher::from_ptr(publisher))
        })
    }
}
