//! Lifetime handles: native-side claims on foreign-managed objects.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::runtime::RawHandle;

/// One claim on a foreign object, keeping it alive across crossings.
///
/// The foreign runtime's collector is free to relocate or reclaim anything
/// the native side holds no claim on, so a raw foreign pointer is never
/// stored here. Instead the runtime mints an opaque token when an object is
/// instantiated or returned from a crossing, and this handle pairs that
/// token with an explicit liveness flag.
///
/// A handle is exactly one unit of ownership: it is not `Clone`, it is
/// valid from the moment the runtime produces it until exactly one release
/// consumes it, and the liveness flag makes a second release detectable
/// instead of undefined. Release goes through
/// [`Bridge::release_handle`](crate::Bridge::release_handle), which is the
/// only code allowed to retire the flag and forward to the runtime.
///
/// Handles are not implicitly thread-safe beyond the flag itself; confine
/// each handle to one owning thread or synchronize externally.
pub struct LifetimeHandle {
    token: RawHandle,
    live: AtomicBool,
}

impl LifetimeHandle {
    /// Wrap a token freshly minted by the foreign runtime.
    pub(crate) fn new(token: RawHandle) -> Self {
        Self {
            token,
            live: AtomicBool::new(true),
        }
    }

    /// The opaque foreign-runtime token behind this claim.
    ///
    /// Only meaningful while the handle is live.
    pub(crate) fn token(&self) -> RawHandle {
        self.token
    }

    /// Whether this claim is still outstanding.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Retire the claim. Returns false if it was already retired, in which
    /// case the caller must not forward the release to the runtime again.
    pub(crate) fn retire(&self) -> bool {
        self.live.swap(false, Ordering::AcqRel)
    }
}

impl fmt::Debug for LifetimeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifetimeHandle")
            .field("token", &self.token)
            .field("live", &self.is_live())
            .finish()
    }
}

impl Drop for LifetimeHandle {
    fn drop(&mut self) {
        // A dropped-while-live handle is a leaked claim: the foreign object
        // stays rooted forever because nothing can release this token now.
        if *self.live.get_mut() {
            log::warn!("leaked lifetime handle for token {}", self.token);
        }
    }
}
