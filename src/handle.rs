//! Owned references to runtime-resident objects.
//!
//! The runtime hands out opaque pointers to objects living on its managed
//! heap; each pointer pins the object against garbage collection until it
//! is released back. [`ObjectHandle`] and [`ObjectHandleList`] own such
//! pointers and release them exactly once, on last drop, from whatever
//! thread that happens on. Clones share ownership of one pointer.
//!
//! A handle may also be absent (null). Absent handles are inert: they
//! report [`Error::InvalidHandle`] from [`ObjectHandle::require`] and
//! their drop makes no native call.
//!
//! The `K` type parameter is a compile-time label only; it never reaches
//! the runtime. It exists so an endpoint handle cannot be passed where a
//! subscription handle is expected.

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::warn;

use crate::error::{Error, Result};
use crate::isolate::Isolate;
use crate::native::abi::ObjectPtr;

/// Marker for the runtime object category a handle refers to.
pub trait HandleKind {
    /// Category name used in errors and logs.
    const NAME: &'static str;
}

/// The handle categories the runtime exposes.
pub mod kind {
    use super::HandleKind;

    macro_rules! handle_kind {
        ($(#[$doc:meta] $name:ident => $label:literal),* $(,)?) => {
            $(
                #[$doc]
                pub struct $name;

                impl HandleKind for $name {
                    const NAME: &'static str = $label;
                }
            )*
        };
    }

    handle_kind! {
        /// A feed endpoint, the connection root object.
        Endpoint => "endpoint",
        /// The event-consuming side of an endpoint.
        Feed => "feed",
        /// The event-producing side of an endpoint.
        Publisher => "publisher",
        /// A symbol subscription on a feed.
        Subscription => "subscription",
        /// A pending single-event request.
        Promise => "promise",
    }
}

/// Shared core of a handle: the pointer plus what its release call is.
///
/// Dropped exactly once, when the last sharing handle goes away. Release
/// runs on the dropping thread, attaching it if needed; a failed release
/// (including one after teardown) is logged and swallowed, since drop has
/// no error channel and the object either leaks or died with the runtime.
struct RawHandle {
    ptr: ObjectPtr,
    kind: &'static str,
    list: bool,
}

// SAFETY: the pointer is an opaque pinning reference; the runtime accepts
// release from any attached thread.
unsafe impl Send for RawHandle {}
unsafe impl Sync for RawHandle {}

impl Drop for RawHandle {
    fn drop(&mut self) {
        if self.ptr.is_null() {
            return;
        }

        let released = Isolate::instance().with_attached(|thread, api| {
            // SAFETY: the pointer came from the runtime and this is its
            // single release.
            let status = if self.list {
                unsafe { (api.object_list_release)(thread.as_ptr(), self.ptr) }
            } else {
                unsafe { (api.object_release)(thread.as_ptr(), self.ptr) }
            };
            if status < 0 {
                return Err(Error::UnspecifiedFailure {
                    entry_point: "gfeed_object_release",
                });
            }
            Ok(())
        });

        if let Err(err) = released {
            warn!(kind = self.kind, error = %err, "handle release failed");
        }
    }
}

/// An owned, shareable reference to one runtime-resident object.
pub struct ObjectHandle<K: HandleKind> {
    raw: Arc<RawHandle>,
    _kind: PhantomData<K>,
}

impl<K: HandleKind> ObjectHandle<K> {
    /// Takes ownership of a pointer the runtime just handed out. A null
    /// pointer produces an absent handle.
    pub(crate) fn new(ptr: ObjectPtr) -> Self {
        ObjectHandle {
            raw: Arc::new(RawHandle {
                ptr,
                kind: K::NAME,
                list: false,
            }),
            _kind: PhantomData,
        }
    }

    /// An absent handle. Inert: no release on drop, `require` fails.
    pub(crate) fn absent() -> Self {
        Self::new(std::ptr::null_mut())
    }

    /// The raw pointer, null when absent.
    pub(crate) fn as_ptr(&self) -> ObjectPtr {
        self.raw.ptr
    }

    /// Whether this handle refers to an object.
    pub fn is_present(&self) -> bool {
        !self.raw.ptr.is_null()
    }

    /// The pointer for use in `operation`, or [`Error::InvalidHandle`]
    /// when absent. Absent handles never reach the runtime.
    pub(crate) fn require(&self, operation: &'static str) -> Result<ObjectPtr> {
        if self.raw.ptr.is_null() {
            return Err(Error::InvalidHandle { operation });
        }
        Ok(self.raw.ptr)
    }
}

impl<K: HandleKind> Clone for ObjectHandle<K> {
    fn clone(&self) -> Self {
        ObjectHandle {
            raw: Arc::clone(&self.raw),
            _kind: PhantomData,
        }
    }
}

impl<K: HandleKind> std::fmt::Debug for ObjectHandle<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("kind", &K::NAME)
            .field("ptr", &self.raw.ptr)
            .finish()
    }
}

/// An owned reference to a runtime-resident list of objects; release is a
/// single batched call covering the list and its elements.
pub struct ObjectHandleList<K: HandleKind> {
    raw: Arc<RawHandle>,
    _kind: PhantomData<K>,
}

impl<K: HandleKind> ObjectHandleList<K> {
    pub(crate) fn new(ptr: ObjectPtr) -> Self {
        ObjectHandleList {
            raw: Arc::new(RawHandle {
                ptr,
                kind: K::NAME,
                list: true,
            }),
            _kind: PhantomData,
        }
    }

    pub(crate) fn as_ptr(&self) -> ObjectPtr {
        self.raw.ptr
    }

    pub fn is_present(&self) -> bool {
        !self.raw.ptr.is_null()
    }
}

impl<K: HandleKind> Clone for ObjectHandleList<K> {
    fn clone(&self) -> Self {
        ObjectHandleList {
            raw: Arc::clone(&self.raw),
            _kind: PhantomData,
        }
    }
}

impl<K: HandleKind> std::fmt::Debug for ObjectHandleList<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectHandleList")
            .field("kind", &K::NAME)
            .field("ptr", &self.raw.ptr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Once;

    use super::{kind, ObjectHandle, ObjectHandleList};
    use crate::error::Error;
    use crate::isolate::Isolate;
    use crate::native::loopback;

    fn setup() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            loopback::install();
            assert!(Isolate::instance().is_live());
        });
    }

    #[test]
    fn absent_handle_is_inert() {
        let handle = ObjectHandle::<kind::Endpoint>::absent();
        assert!(!handle.is_present());
        assert!(matches!(
            handle.require("endpoint_connect"),
            Err(Error::InvalidHandle {
                operation: "endpoint_connect"
            })
        ));
    }

    // Release accounting lives in one test so the process-wide counters
    // are not bumped concurrently by sibling tests.
    #[test]
    fn release_accounting() {
        setup();

        // Absent handles never call into the backend.
        let before = loopback::release_calls();
        drop(ObjectHandle::<kind::Feed>::absent());
        assert_eq!(loopback::release_calls(), before);

        // Clones share one release.
        let before = loopback::release_calls();
        let handle = ObjectHandle::<kind::Endpoint>::new(loopback::new_object());
        let clone = handle.clone();
        drop(handle);
        assert_eq!(loopback::release_calls(), before);
        drop(clone);
        assert_eq!(loopback::release_calls(), before + 1);

        // Release runs from whatever thread drops last.
        let before = loopback::release_calls();
        let handle = ObjectHandle::<kind::Endpoint>::new(loopback::new_object());
        std::thread::spawn(move || drop(handle))
            .join()
            .expect("drop thread panicked");
        assert_eq!(loopback::release_calls(), before + 1);

        // A handle list releases through the batch entry point, once.
        let before_list = loopback::list_release_calls();
        let before_single = loopback::release_calls();
        let list = ObjectHandleList::<kind::Promise>::new(loopback::new_object_list());
        assert!(list.is_present());
        drop(list);
        assert_eq!(loopback::list_release_calls(), before_list + 1);
        assert_eq!(loopback::release_calls(), before_single);
    }
}
