//! Native-side references to live foreign objects.

use std::fmt;
use std::sync::Arc;

use crate::descriptor::TypeDescriptor;
use crate::handle::LifetimeHandle;

/// One live foreign object the native side can operate on.
///
/// Pairs a shared [`TypeDescriptor`] with an owned [`LifetimeHandle`]:
/// many references to instances of the same type share one descriptor,
/// while each reference owns exactly one lifetime claim. The handle's
/// referent is an instance of (or assignable to) the descriptor's type.
///
/// `InstanceRef` is not `Clone` for the same reason the handle is not:
/// duplicating it would duplicate a claim that must be released exactly
/// once.
pub struct InstanceRef {
    descriptor: Arc<TypeDescriptor>,
    handle: LifetimeHandle,
}

impl InstanceRef {
    pub(crate) fn new(descriptor: Arc<TypeDescriptor>, handle: LifetimeHandle) -> Self {
        Self { descriptor, handle }
    }

    /// The cached descriptor for this instance's type.
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// The lifetime claim backing this reference.
    pub fn handle(&self) -> &LifetimeHandle {
        &self.handle
    }

    /// Whether the underlying claim is still outstanding.
    pub fn is_live(&self) -> bool {
        self.handle.is_live()
    }

    /// Whether two references point at the same foreign object claim.
    pub(crate) fn same_referent(&self, other: &InstanceRef) -> bool {
        self.handle.token() == other.handle.token()
    }
}

impl fmt::Debug for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceRef")
            .field("type", &self.descriptor.name())
            .field("handle", &self.handle)
            .finish()
    }
}
