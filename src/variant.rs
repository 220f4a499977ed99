//! Tagged variant values crossed over the runtime boundary.
//!
//! [`Variant`] is a closed sum: every value that crosses the boundary in
//! either direction is one of its tags, so encode/decode logic on both
//! sides is total and exhaustively testable. The matching classification
//! set is [`ValueKind`], which descriptors use for declared member types.

use std::fmt;

use crate::instance::InstanceRef;

/// The closed classification set shared by variants and descriptors.
///
/// Declared member types only ever classify as `Void` (method returns),
/// `Bool`, `Int`, `Float`, `Str` or `Object`; `Null` exists because a
/// variant can carry a null object reference at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Void,
    Bool,
    Int,
    Float,
    Str,
    Object,
    Null,
}

impl ValueKind {
    /// Get the name of this kind.
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Void => "void",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "string",
            ValueKind::Object => "object",
            ValueKind::Null => "null",
        }
    }

    /// Whether a value of kind `actual` may be supplied where `self` is
    /// declared.
    ///
    /// Exact matches are accepted, `Int` widens implicitly to `Float`, and
    /// `Null` is accepted for the reference-shaped kinds (`Object`, `Str`).
    /// No other coercion happens silently.
    pub fn accepts(self, actual: ValueKind) -> bool {
        if self == actual {
            return true;
        }
        match (self, actual) {
            (ValueKind::Float, ValueKind::Int) => true,
            (ValueKind::Object | ValueKind::Str, ValueKind::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A dynamically-typed value passed across the boundary.
///
/// Constructed immediately before a crossing and consumed immediately
/// after; an output slot may be reused across crossings since the bridge
/// populates it in place. An `Object` variant owns its [`InstanceRef`] and
/// with it one lifetime claim, which is why `Variant` is not `Clone`.
#[derive(Debug, Default)]
pub enum Variant {
    /// No value (method returned void).
    #[default]
    Void,
    /// Boolean value.
    Bool(bool),
    /// Integer value; all foreign integer widths are carried as `i64`.
    Int(i64),
    /// Floating-point value; carried as `f64`.
    Float(f64),
    /// String value (owned).
    String(String),
    /// Live foreign object reference.
    Object(InstanceRef),
    /// Null object reference.
    Null,
}

impl Variant {
    /// The active tag's classification.
    pub fn kind(&self) -> ValueKind {
        match self {
            Variant::Void => ValueKind::Void,
            Variant::Bool(_) => ValueKind::Bool,
            Variant::Int(_) => ValueKind::Int,
            Variant::Float(_) => ValueKind::Float,
            Variant::String(_) => ValueKind::Str,
            Variant::Object(_) => ValueKind::Object,
            Variant::Null => ValueKind::Null,
        }
    }

    /// Check if this variant is void.
    pub fn is_void(&self) -> bool {
        matches!(self, Variant::Void)
    }

    /// Check if this variant is a null reference.
    pub fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    /// Take the value out, leaving `Void` in the slot.
    pub fn take(&mut self) -> Variant {
        std::mem::take(self)
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Variant::Void, Variant::Void) => true,
            (Variant::Bool(a), Variant::Bool(b)) => a == b,
            (Variant::Int(a), Variant::Int(b)) => a == b,
            (Variant::Float(a), Variant::Float(b)) => a == b,
            (Variant::String(a), Variant::String(b)) => a == b,
            // Two object variants are equal when they refer to the same
            // foreign object claim.
            (Variant::Object(a), Variant::Object(b)) => a.same_referent(b),
            (Variant::Null, Variant::Null) => true,
            _ => false,
        }
    }
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Variant::Bool(v)
    }
}

impl From<i64> for Variant {
    fn from(v: i64) -> Self {
        Variant::Int(v)
    }
}

impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Variant::Float(v)
    }
}

impl From<&str> for Variant {
    fn from(v: &str) -> Self {
        Variant::String(v.to_string())
    }
}

impl From<String> for Variant {
    fn from(v: String) -> Self {
        Variant::String(v)
    }
}

impl From<InstanceRef> for Variant {
    fn from(v: InstanceRef) -> Self {
        Variant::Object(v)
    }
}

/// An ordered sequence of variants, one per formal parameter.
///
/// The list's length is fixed at call time by the method being invoked;
/// arity and positional kinds are validated against the method descriptor
/// before any foreign call is attempted.
#[derive(Debug, Default)]
pub struct VariantList {
    items: Vec<Variant>,
}

impl VariantList {
    /// Create an empty argument list.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create an empty list with room for `capacity` arguments.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Append an argument.
    pub fn push(&mut self, value: impl Into<Variant>) {
        self.items.push(value.into());
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The argument at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Variant> {
        self.items.get(index)
    }

    /// Iterate over the arguments in positional order.
    pub fn iter(&self) -> std::slice::Iter<'_, Variant> {
        self.items.iter()
    }

    /// View the arguments as a slice.
    pub fn as_slice(&self) -> &[Variant] {
        &self.items
    }
}

impl From<Vec<Variant>> for VariantList {
    fn from(items: Vec<Variant>) -> Self {
        Self { items }
    }
}

impl<'a> IntoIterator for &'a VariantList {
    type Item = &'a Variant;
    type IntoIter = std::slice::Iter<'a, Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
