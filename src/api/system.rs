//! The runtime's system property store.

use tracing::warn;

use crate::error::Result;
use crate::events::marshal::read_c_string;
use crate::exception::{check_pending, expect_success};
use crate::isolate::Isolate;

use super::c_string;

/// Sets a runtime system property. Properties configure the runtime
/// itself (timeouts, aggregation periods, feature switches).
pub fn set_property(key: &str, value: &str) -> Result<()> {
    let key_c = c_string(key);
    let value_c = c_string(value);
    Isolate::instance().with_attached(|thread, api| {
        // SAFETY: both buffers outlive the call.
        let status = unsafe {
            (api.system_set_property)(thread.as_ptr(), key_c.as_ptr(), value_c.as_ptr())
        };
        expect_success(api, thread, status, "gfeed_system_set_property")
    })
}

/// Reads a runtime system property. `None` when the property is unset.
pub fn get_property(key: &str) -> Result<Option<String>> {
    let key_c = c_string(key);
    Isolate::instance().with_attached(|thread, api| {
        // SAFETY: the key buffer outlives the call.
        let raw = unsafe { (api.system_get_property)(thread.as_ptr(), key_c.as_ptr()) };
        if raw.is_null() {
            check_pending(api, thread)?;
            return Ok(None);
        }

        // SAFETY: a non-null result is a runtime-owned string, valid until
        // the release below.
        let value = unsafe { read_c_string(raw) };

        // SAFETY: released exactly once; the copy above is independent.
        let status = unsafe { (api.string_release)(thread.as_ptr(), raw) };
        if status < 0 {
            warn!(key, "property string release failed");
        }

        Ok(Some(value))
    })
}
