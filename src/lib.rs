//! Reflection-and-invocation bridge between a native UI engine and a
//! garbage-collected managed runtime.
//!
//! The bridge lets the native side treat foreign-managed objects as typed
//! objects: it discovers a foreign type's shape once, instantiates foreign
//! objects, and marshals property reads/writes and method calls across the
//! runtime boundary. The two runtimes keep independent memory management
//! (manual on the native side, a relocating collector on the foreign
//! side), so every crossing is mediated by three things:
//!
//! - [`LifetimeHandle`]: one explicit, single-release claim per foreign
//!   object held natively; never a raw foreign pointer.
//! - [`TypeDescriptor`]: an immutable, cached description of a foreign
//!   type's full effective interface, built by one reflect crossing and
//!   reused for every instance of that type.
//! - [`Variant`]: a closed tagged sum for every value that crosses, in
//!   either direction, so marshaling is total and exhaustively testable.
//!
//! The foreign runtime itself sits behind the [`ForeignRuntime`] trait;
//! [`Bridge`] hosts the seven boundary operations on top of it.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use managed_bridge::{Bridge, Variant, VariantList};
//!
//! let bridge = Bridge::new(runtime); // runtime: Arc<dyn ForeignRuntime>
//!
//! if bridge.is_type_valid("Sample.Counter")? {
//!     let counter = bridge.build_type_descriptor("Sample.Counter")?;
//!     let target = bridge.instantiate(&counter)?;
//!
//!     let mut result = Variant::Void;
//!     let mut args = VariantList::new();
//!     args.push(5i64);
//!     let add = counter.method("Add").unwrap();
//!     bridge.invoke_method(add, &target, &args, &mut result)?;
//!
//!     bridge.release_handle(target.handle())?;
//! }
//! ```
//!
//! # Ownership across the boundary
//!
//! Receiving an object reference from a read, an invocation return, or
//! instantiation transfers one unit of ownership: the receiver must
//! release it exactly once. Passing an object reference as a method
//! argument does not transfer ownership; the callee borrows it for the
//! call's duration.

pub mod bridge;
pub mod descriptor;
pub mod error;
pub mod handle;
pub mod instance;
pub mod runtime;
pub mod type_hash;
pub mod variant;

pub use bridge::Bridge;
pub use descriptor::{Access, DataType, MethodDescriptor, PropertyDescriptor, TypeDescriptor};
pub use error::{BridgeError, Result};
pub use handle::LifetimeHandle;
pub use instance::InstanceRef;
pub use runtime::{
    ForeignRuntime, ForeignType, ForeignValue, MethodShape, PropertyShape, RawHandle,
    RuntimeFault, TypeShape,
};
pub use type_hash::TypeHash;
pub use variant::{ValueKind, Variant, VariantList};
