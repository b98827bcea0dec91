//! The high-level feed API: endpoints, feeds, subscriptions, publishers,
//! promises, and the runtime property store.
//!
//! Every type here is a thin owner of an [`ObjectHandle`]; every method
//! funnels through [`Isolate::with_attached`] and drains the thread
//! exception slot on failure. Methods take `&self`; sharing across
//! threads is the runtime's concern, not this layer's.
//!
//! [`ObjectHandle`]: crate::handle::ObjectHandle
//! [`Isolate::with_attached`]: crate::isolate::Isolate::with_attached

mod endpoint;
mod feed;
mod promise;
mod publisher;
mod system;

pub use endpoint::Endpoint;
pub use feed::{Feed, Subscription};
pub use promise::EventPromise;
pub use publisher::Publisher;
pub use system::{get_property, set_property};

use std::ffi::CString;

/// Copies `s` into a NUL-terminated buffer for one native call. Interior
/// NUL bytes cannot cross the ABI; the copy truncates at the first one.
fn c_string(s: &str) -> CString {
    CString::new(s).unwrap_or_else(|err| {
        let end = err.nul_position();
        let mut bytes = err.into_vec();
        bytes.truncate(end);
        // Truncated at the offending NUL, so this cannot fail.
        CString::new(bytes).unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::c_string;

    #[test]
    fn c_string_passes_plain_text_through() {
        assert_eq!(c_string("AAPL").as_bytes(), b"AAPL");
    }

    #[test]
    fn c_string_truncates_at_interior_nul() {
        assert_eq!(c_string("AB\0CD").as_bytes(), b"AB");
    }
}
