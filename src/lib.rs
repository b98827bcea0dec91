//! `graalfeed` embeds a pre-compiled market data feed runtime in a Rust
//! process and exposes it as a safe, typed API.
//!
//! The runtime is a native image of a managed runtime: it brings its own
//! heap and garbage collector, requires explicit per-thread attachment,
//! reports failures through a per-thread exception slot, and hands out
//! opaque pointers to objects on its heap. This crate fences all of that
//! behind three layers:
//!
//! ```text
//!  +---------------------------------------------------------------+
//!  |  api: Endpoint / Feed / Subscription / Publisher / Promise    |
//!  +-------------------+---------------------+---------------------+
//!  |  handle:          |  events:            |  exception:         |
//!  |  ObjectHandle     |  Event <-> native   |  pending-slot       |
//!  |  (release once)   |  tagged records     |  drain to Error     |
//!  +-------------------+---------------------+---------------------+
//!  |  isolate: singleton, thread attachment, teardown              |
//!  +---------------------------------------------------------------+
//!  |  native: ABI table (shared library loader / loopback)         |
//!  +---------------------------------------------------------------+
//! ```
//!
//! Threading model: any thread may call anything. The first call from a
//! thread attaches it to the isolate; the attachment is cached so later
//! calls cost nothing extra. Handles release their runtime object from
//! whatever thread drops them last.
//!
//! # Example
//!
//! ```no_run
//! use graalfeed::{Endpoint, EventKind};
//!
//! fn main() -> graalfeed::Result<()> {
//!     let endpoint = Endpoint::create()?;
//!     endpoint.connect("demo.host:7300")?;
//!
//!     let feed = endpoint.feed()?;
//!     let subscription = feed.create_subscription(EventKind::Quote)?;
//!     subscription.add_symbol("AAPL")?;
//!
//!     let promise = feed.last_event_promise(EventKind::Quote, "AAPL")?;
//!     if let Some(event) = promise.result_timeout(std::time::Duration::from_secs(5))? {
//!         println!("{event:?}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod constants;
pub mod error;
pub mod events;
pub mod exception;
pub mod handle;
pub mod isolate;
pub mod native;

pub use api::{get_property, set_property, Endpoint, EventPromise, Feed, Publisher, Subscription};
pub use error::{Error, Result};
pub use events::{Event, EventKind};
pub use isolate::Isolate;
