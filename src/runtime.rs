//! The seam to the foreign managed runtime.
//!
//! Everything the bridge needs from the foreign side is expressed through
//! the [`ForeignRuntime`] trait: type resolution and reflection, object
//! activation, the collector's handle mint/release facility, and member
//! access/invocation. The bridge owns descriptors, variants and lifetime
//! discipline; the runtime owns its type system, its collector and its
//! exception model.
//!
//! Every trait method is a boundary crossing. Crossings are synchronous:
//! the two call stacks are linked for the duration of the call, so a
//! foreign call that blocks indefinitely blocks the native thread
//! indefinitely. There is no cancellation at this layer. Implementations
//! must be re-entrant-safe for concurrent calls from multiple native
//! threads; the bridge assumes this but cannot enforce it.

use thiserror::Error;

/// Opaque token minted by the foreign runtime's GC-handle facility.
///
/// The token pins the referent against collection and stays valid across
/// relocation; it carries no pointer the native side could dereference.
pub type RawHandle = u64;

/// A member type as the foreign runtime's reflection reports it.
///
/// The bridge maps these into the closed
/// [`ValueKind`](crate::variant::ValueKind) set during descriptor
/// construction; `Other` is what makes that mapping fail with
/// `UnsupportedType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignType {
    Void,
    Bool,
    Int,
    Float,
    String,
    /// An object type, with the runtime's qualified name for it.
    Object(String),
    /// Anything outside the representable set (pointers, generics over
    /// unsupported arguments, by-ref structs, ...).
    Other(String),
}

/// Raw reflected shape of one property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyShape {
    /// Property name.
    pub name: String,
    /// Declared type as the runtime reports it.
    pub value_type: ForeignType,
    /// Whether a getter exists.
    pub readable: bool,
    /// Whether a setter exists.
    pub writable: bool,
}

/// Raw reflected shape of one method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodShape {
    /// Method name.
    pub name: String,
    /// Parameter types in positional order.
    pub params: Vec<ForeignType>,
    /// Return type; [`ForeignType::Void`] for void methods.
    pub return_type: ForeignType,
}

/// Raw reflected shape of one foreign type.
///
/// Inherited members must already be flattened into these lists: the
/// runtime resolves its own inheritance semantics and reports the type's
/// full effective interface.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeShape {
    /// The type's qualified name.
    pub name: String,
    /// Exposed properties, base-most first.
    pub properties: Vec<PropertyShape>,
    /// Exposed methods, base-most first.
    pub methods: Vec<MethodShape>,
}

/// The wire-level value enum crossing the seam in either direction.
///
/// Object values carry the minted token together with the referent's
/// runtime type name, so the receiving side can resolve a descriptor and
/// take ownership of the claim.
#[derive(Debug, Clone, PartialEq)]
pub enum ForeignValue {
    Void,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Object {
        /// Freshly minted claim when flowing foreign-to-native; a borrowed
        /// token when flowing native-to-foreign as an argument.
        handle: RawHandle,
        /// The referent's runtime type name.
        type_name: String,
    },
    Null,
}

/// Structured foreign-side failure.
///
/// Foreign exceptions never unwind into native code; they arrive here as
/// data and the bridge re-packages them into
/// [`BridgeError`](crate::BridgeError) variants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeFault {
    /// The runtime itself is gone or not responding.
    #[error("runtime unavailable: {0}")]
    Unavailable(String),

    /// Activation target is abstract.
    #[error("type is abstract")]
    TypeAbstract,

    /// Activation target has no zero-argument constructor.
    #[error("no zero-argument constructor")]
    NoDefaultConstructor,

    /// A member named in a crossing does not exist on the referent.
    #[error("missing member: {0}")]
    MissingMember(String),

    /// The token does not name a live claim.
    #[error("stale handle")]
    StaleHandle,

    /// A foreign exception was raised during the crossing.
    #[error("{type_name}: {message}")]
    Exception {
        /// The exception's type name.
        type_name: String,
        /// The exception's message, verbatim.
        message: String,
    },
}

/// The foreign managed runtime, as consumed by the bridge.
pub trait ForeignRuntime: Send + Sync {
    /// Resolve a type name to a concrete, instantiable type.
    ///
    /// Absence is `Ok(false)`; only infrastructure failure is an `Err`.
    /// Must not materialize member metadata.
    fn resolve_type(&self, name: &str) -> Result<bool, RuntimeFault>;

    /// Reflect a type's full effective interface, inherited members
    /// flattened in.
    fn reflect_type(&self, name: &str) -> Result<TypeShape, RuntimeFault>;

    /// Allocate a new instance via the zero-argument constructor and mint a
    /// claim on it.
    fn instantiate(&self, name: &str) -> Result<RawHandle, RuntimeFault>;

    /// Return a claim to the collector, permitting collection of the
    /// referent once no other claim or foreign root remains.
    ///
    /// Infallible by design: the bridge guarantees each token is forwarded
    /// here at most once.
    fn release(&self, token: RawHandle);

    /// Read a property's current value from the referent.
    fn read_member(&self, target: RawHandle, member: &str) -> Result<ForeignValue, RuntimeFault>;

    /// Push a value into a property of the referent.
    fn write_member(
        &self,
        target: RawHandle,
        member: &str,
        value: ForeignValue,
    ) -> Result<(), RuntimeFault>;

    /// Invoke a method on the referent with positional arguments.
    ///
    /// Argument tokens are borrowed for the call's duration; a returned
    /// object token is a fresh claim owned by the caller.
    fn invoke(
        &self,
        target: RawHandle,
        method: &str,
        args: Vec<ForeignValue>,
    ) -> Result<ForeignValue, RuntimeFault>;
}
