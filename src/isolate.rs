//! The process-wide isolate and per-thread attachments.
//!
//! The feed runtime is an embedded managed runtime with its own heap and
//! garbage collector; exactly one instance (the isolate) exists per
//! process, and every native call must run on a thread attached to it.
//! This module owns both concerns:
//!
//! - [`Isolate::instance`] is the lazy process-wide singleton. A failed
//!   creation is permanent: the isolate stays dead and every operation
//!   reports [`Error::RuntimeUnavailable`]; retrying is a caller policy
//!   decision, never automatic.
//! - Attachments are cached thread-locally. The first call from a thread
//!   performs the foreign attach; later calls are cache hits with no
//!   foreign traffic. Detach is idempotent. Threads that exit while
//!   attached detach themselves, except the main isolate thread.
//! - [`Isolate::teardown`] detaches all threads and destroys the runtime
//!   as one atomic foreign call, exactly once; afterwards the isolate is
//!   permanently dead.
//!
//! A shared/exclusive lock guards the isolate's own handle fields: shared
//! for every attach/call path, exclusive for the one-time teardown.
//! Attachment state itself needs no lock because it is thread-local.

use std::cell::Cell;
use std::ptr;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, warn};

use crate::error::{Error, Result};
use crate::native::abi::{EntryPointStatus, IsolatePtr, IsolateThreadPtr};
use crate::native::{loader, Backend, NativeApi};

static INSTANCE: OnceCell<Isolate> = OnceCell::new();

/// Backend staged by [`install_backend`] for the not-yet-created isolate.
static PENDING_BACKEND: Mutex<Option<Backend>> = Mutex::new(None);

thread_local! {
    static CURRENT_THREAD: ThreadSlot = ThreadSlot::new();
}

/// Stages a backend for the isolate before its first use.
///
/// Has no effect once the isolate exists; the isolate's backend is fixed
/// for the process lifetime.
pub fn install_backend(backend: Backend) {
    if INSTANCE.get().is_some() {
        warn!("isolate already created; installed backend ignored");
        return;
    }
    *PENDING_BACKEND.lock() = Some(backend);
}

/// Per-thread attachment cache.
///
/// A thread is either fully attached (non-null handle) or fully detached
/// (null); there is no intermediate state. The slot is usable only by its
/// own thread, which thread-local storage enforces by construction.
struct ThreadSlot {
    handle: Cell<IsolateThreadPtr>,
    is_main: Cell<bool>,
}

impl ThreadSlot {
    fn new() -> ThreadSlot {
        ThreadSlot {
            handle: Cell::new(ptr::null_mut()),
            is_main: Cell::new(false),
        }
    }
}

impl Drop for ThreadSlot {
    fn drop(&mut self) {
        let handle = self.handle.get();
        if handle.is_null() || self.is_main.get() {
            // The main isolate thread belongs to the isolate itself and is
            // only ever released by teardown.
            return;
        }

        // Thread exit while attached: detach so the runtime does not keep
        // a dead thread registered. Skipped when the isolate is already
        // gone.
        if let Some(isolate) = INSTANCE.get() {
            let state = isolate.state.read_recursive();
            if let State::Live { backend, .. } = &*state {
                // SAFETY: the handle was produced by attach_thread on this
                // thread and has not been detached.
                let status = EntryPointStatus(unsafe { (backend.api.detach_thread)(handle) });
                if !status.is_ok() {
                    warn!(%status, "thread auto-detach failed");
                }
            }
        }
    }
}

/// An attachment of the current thread to the isolate, valid for the
/// duration of one [`Isolate::with_attached`] call.
#[derive(Clone, Copy)]
pub struct AttachedThread(IsolateThreadPtr);

impl AttachedThread {
    /// The raw thread handle for passing into native entry points.
    pub fn as_ptr(&self) -> IsolateThreadPtr {
        self.0
    }
}

enum State {
    Live {
        backend: Arc<Backend>,
        isolate: IsolatePtr,
        main_thread: IsolateThreadPtr,
    },
    Dead,
}

// SAFETY: the isolate and thread handles are opaque references into the
// runtime image, which serializes its own internal state; thread affinity
// is carried by the attachment slots, not by these fields.
unsafe impl Send for State {}
unsafe impl Sync for State {}

/// The process-wide embedded runtime instance.
pub struct Isolate {
    state: RwLock<State>,
}

impl Isolate {
    /// Returns the process-wide isolate, creating it on first call.
    ///
    /// Creation uses the backend staged by [`install_backend`], falling
    /// back to loading the runtime shared library. Both the created and
    /// the permanently-dead outcome are cached.
    pub fn instance() -> &'static Isolate {
        INSTANCE.get_or_init(Isolate::bootstrap)
    }

    fn bootstrap() -> Isolate {
        let staged = PENDING_BACKEND.lock().take();
        let backend = match staged {
            Some(backend) => backend,
            None => match loader::load_default() {
                Ok(backend) => backend,
                Err(err) => {
                    error!(error = %err, "feed runtime library unavailable");
                    return Isolate {
                        state: RwLock::new(State::Dead),
                    };
                }
            },
        };
        Isolate::create(backend)
    }

    fn create(backend: Backend) -> Isolate {
        let mut isolate: IsolatePtr = ptr::null_mut();
        let mut main_thread: IsolateThreadPtr = ptr::null_mut();

        // SAFETY: out-pointers are valid; a successful call initializes
        // both.
        let status = EntryPointStatus(unsafe {
            (backend.api.create_isolate)(ptr::null_mut(), &mut isolate, &mut main_thread)
        });

        if !status.is_ok() || isolate.is_null() {
            error!(%status, "isolate creation failed");
            return Isolate {
                state: RwLock::new(State::Dead),
            };
        }

        // The creating thread comes back attached as the main isolate
        // thread.
        CURRENT_THREAD.with(|slot| {
            slot.handle.set(main_thread);
            slot.is_main.set(true);
        });

        debug!(?isolate, "isolate created");

        Isolate {
            state: RwLock::new(State::Live {
                backend: Arc::new(backend),
                isolate,
                main_thread,
            }),
        }
    }

    /// Whether the isolate was created and has not been torn down.
    pub fn is_live(&self) -> bool {
        matches!(&*self.state.read_recursive(), State::Live { .. })
    }

    /// Attaches the calling thread, or returns the cached attachment.
    pub fn attach(&self) -> Result<AttachedThread> {
        let state = self.state.read_recursive();
        match &*state {
            State::Live {
                backend,
                isolate,
                main_thread,
            } => attach_current(&backend.api, *isolate, *main_thread),
            State::Dead => Err(Error::RuntimeUnavailable),
        }
    }

    /// Detaches the calling thread. A never-attached thread is a no-op
    /// reported as success, with no foreign call.
    pub fn detach(&self) -> Result<()> {
        CURRENT_THREAD.with(|slot| {
            let handle = slot.handle.get();
            if handle.is_null() {
                return Ok(());
            }

            let state = self.state.read_recursive();
            if let State::Live { backend, .. } = &*state {
                // SAFETY: the handle is this thread's own live attachment.
                let status = EntryPointStatus(unsafe { (backend.api.detach_thread)(handle) });
                if !status.is_ok() {
                    return Err(Error::UnspecifiedFailure {
                        entry_point: "gfeed_detach_thread",
                    });
                }
            }

            slot.handle.set(ptr::null_mut());
            slot.is_main.set(false);
            debug!("thread detached from isolate");
            Ok(())
        })
    }

    /// Runs `f` with the calling thread attached, under the shared lock.
    ///
    /// This is the single choke point for native calls: liveness check,
    /// attach-if-needed, then `f` with the thread handle and the ABI
    /// table. Nested calls from within `f` are permitted (the shared lock
    /// is re-entered, the attachment is a cache hit).
    pub fn with_attached<T>(
        &self,
        f: impl FnOnce(AttachedThread, &NativeApi) -> Result<T>,
    ) -> Result<T> {
        let state = self.state.read_recursive();
        match &*state {
            State::Live {
                backend,
                isolate,
                main_thread,
            } => {
                let thread = attach_current(&backend.api, *isolate, *main_thread)?;
                f(thread, &backend.api)
            }
            State::Dead => Err(Error::RuntimeUnavailable),
        }
    }

    /// Detaches every thread the runtime knows about and destroys the
    /// isolate, as one atomic foreign call.
    ///
    /// One-way: afterwards the isolate is permanently dead and any attach
    /// fails with [`Error::RuntimeUnavailable`]. Repeated teardown
    /// requests are no-ops.
    pub fn teardown(&self) -> Result<()> {
        let mut state = self.state.write();

        let (backend, isolate, main_thread) = match &*state {
            State::Live {
                backend,
                isolate,
                main_thread,
            } => (Arc::clone(backend), *isolate, *main_thread),
            State::Dead => return Ok(()),
        };

        // The teardown call itself needs an attached thread.
        let thread = CURRENT_THREAD.with(|slot| {
            let cached = slot.handle.get();
            if !cached.is_null() {
                return Ok(cached);
            }
            let mut fresh: IsolateThreadPtr = ptr::null_mut();
            // SAFETY: the isolate handle is live until this function
            // replaces the state below.
            let status =
                EntryPointStatus(unsafe { (backend.api.attach_thread)(isolate, &mut fresh) });
            if !status.is_ok() {
                return Err(Error::AttachFailed { status });
            }
            slot.handle.set(fresh);
            slot.is_main.set(fresh == main_thread);
            Ok(fresh)
        })?;

        // SAFETY: `thread` is this thread's live attachment; the runtime
        // consumes every attachment during teardown.
        let status = EntryPointStatus(unsafe {
            (backend.api.detach_all_threads_and_tear_down_isolate)(thread)
        });

        // Dead regardless of the reported status; a half-torn-down isolate
        // must not be reanimated.
        *state = State::Dead;
        CURRENT_THREAD.with(|slot| {
            slot.handle.set(ptr::null_mut());
            slot.is_main.set(false);
        });

        if !status.is_ok() {
            warn!(%status, "isolate teardown reported failure");
            return Err(Error::UnspecifiedFailure {
                entry_point: "gfeed_detach_all_threads_and_tear_down_isolate",
            });
        }

        debug!("isolate torn down");
        Ok(())
    }
}

fn attach_current(
    api: &NativeApi,
    isolate: IsolatePtr,
    main_thread: IsolateThreadPtr,
) -> Result<AttachedThread> {
    CURRENT_THREAD.with(|slot| {
        let cached = slot.handle.get();
        if !cached.is_null() {
            return Ok(AttachedThread(cached));
        }

        let mut fresh: IsolateThreadPtr = ptr::null_mut();
        // SAFETY: the isolate handle is live under the caller's shared
        // lock; a successful call initializes `fresh`.
        let status = EntryPointStatus(unsafe { (api.attach_thread)(isolate, &mut fresh) });
        if !status.is_ok() || fresh.is_null() {
            return Err(Error::AttachFailed { status });
        }

        slot.handle.set(fresh);
        slot.is_main.set(fresh == main_thread);
        debug!("thread attached to isolate");
        Ok(AttachedThread(fresh))
    })
}
