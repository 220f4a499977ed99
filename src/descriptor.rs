//! Cached structural descriptions of foreign types.
//!
//! A [`TypeDescriptor`] is built by one reflect crossing per distinct type
//! name and is immutable afterward: the dynamic member lookup the foreign
//! runtime would do per call is paid once, and every subsequent crossing
//! routes through an indexed, pre-validated member descriptor instead.
//!
//! Inherited members are flattened into the one descriptor. No base-type
//! chain is modeled; the descriptor is the type's full effective interface.

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::type_hash::TypeHash;
use crate::variant::ValueKind;

bitflags! {
    /// Read/write capability of a property.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Access: u8 {
        /// The property has a getter.
        const READ = 1 << 0;
        /// The property has a setter.
        const WRITE = 1 << 1;
    }
}

/// A member's declared value type.
///
/// Pairs the classification the bridge dispatches on with the foreign
/// runtime's own name for the type. The name is what descriptor
/// construction for object-typed members keys on, and what error messages
/// show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataType {
    /// Classification within the closed variant set.
    pub kind: ValueKind,
    /// The foreign runtime's qualified name for the type.
    pub type_name: String,
}

impl DataType {
    /// Create a data type.
    pub fn new(kind: ValueKind, type_name: impl Into<String>) -> Self {
        Self {
            kind,
            type_name: type_name.into(),
        }
    }

    /// The void return type.
    pub fn void() -> Self {
        Self::new(ValueKind::Void, "void")
    }
}

/// One exposed property of a foreign type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    /// Property name.
    pub name: String,
    /// Declared value type.
    pub value_type: DataType,
    /// Read/write capability.
    pub access: Access,
    /// Hash of the descriptor this property belongs to.
    pub owner: TypeHash,
}

impl PropertyDescriptor {
    /// Whether the property can be read.
    pub fn is_readable(&self) -> bool {
        self.access.contains(Access::READ)
    }

    /// Whether the property can be written.
    pub fn is_writable(&self) -> bool {
        self.access.contains(Access::WRITE)
    }
}

/// One exposed method of a foreign type.
///
/// Identifies a single concrete method: overload resolution happens on the
/// foreign side during reflection, never at invocation time.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
    /// Method name.
    pub name: String,
    /// Parameter types in positional order.
    pub params: Vec<DataType>,
    /// Return type; [`DataType::void`] for void methods.
    pub return_type: DataType,
    /// Hash of the descriptor this method belongs to.
    pub owner: TypeHash,
}

impl MethodDescriptor {
    /// Declared parameter count.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// The full effective interface of one foreign type.
///
/// Built once per distinct type name, immutable and cacheable thereafter:
/// the same descriptor is shared (as `Arc<TypeDescriptor>`) by every
/// instance of the type and is safe to read from any thread.
#[derive(Debug)]
pub struct TypeDescriptor {
    name: String,
    type_hash: TypeHash,
    properties: Vec<PropertyDescriptor>,
    methods: Vec<MethodDescriptor>,
    property_index: FxHashMap<String, usize>,
    method_index: FxHashMap<String, usize>,
}

impl TypeDescriptor {
    /// Assemble a descriptor from reflected members.
    ///
    /// Member order is preserved as reflected; name-to-index side tables
    /// are built here so per-crossing lookups stay O(1).
    pub fn new(
        name: impl Into<String>,
        properties: Vec<PropertyDescriptor>,
        methods: Vec<MethodDescriptor>,
    ) -> Self {
        let name = name.into();
        let type_hash = TypeHash::from_name(&name);
        let property_index = properties
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.clone(), i))
            .collect();
        let method_index = methods
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.clone(), i))
            .collect();
        Self {
            name,
            type_hash,
            properties,
            methods,
            property_index,
            method_index,
        }
    }

    /// The foreign type's qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The deterministic identity hash of this type.
    pub fn type_hash(&self) -> TypeHash {
        self.type_hash
    }

    /// Exposed properties in reflected order.
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Exposed methods in reflected order.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.property_index.get(name).map(|&i| &self.properties[i])
    }

    /// Look up a method by name.
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.method_index.get(name).map(|&i| &self.methods[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_descriptor() -> TypeDescriptor {
        let owner = TypeHash::from_name("Sample.Counter");
        TypeDescriptor::new(
            "Sample.Counter",
            vec![
                PropertyDescriptor {
                    name: "Value".to_string(),
                    value_type: DataType::new(ValueKind::Int, "System.Int64"),
                    access: Access::READ | Access::WRITE,
                    owner,
                },
                PropertyDescriptor {
                    name: "Id".to_string(),
                    value_type: DataType::new(ValueKind::Str, "System.String"),
                    access: Access::READ,
                    owner,
                },
            ],
            vec![MethodDescriptor {
                name: "Add".to_string(),
                params: vec![DataType::new(ValueKind::Int, "System.Int64")],
                return_type: DataType::new(ValueKind::Int, "System.Int64"),
                owner,
            }],
        )
    }

    #[test]
    fn lookup_by_name() {
        let desc = sample_descriptor();
        assert_eq!(desc.property("Value").unwrap().value_type.kind, ValueKind::Int);
        assert_eq!(desc.method("Add").unwrap().arity(), 1);
        assert!(desc.property("Missing").is_none());
        assert!(desc.method("Missing").is_none());
    }

    #[test]
    fn member_order_is_preserved() {
        let desc = sample_descriptor();
        let names: Vec<_> = desc.properties().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Value", "Id"]);
    }

    #[test]
    fn access_flags() {
        let desc = sample_descriptor();
        let value = desc.property("Value").unwrap();
        assert!(value.is_readable());
        assert!(value.is_writable());
        let id = desc.property("Id").unwrap();
        assert!(id.is_readable());
        assert!(!id.is_writable());
    }

    #[test]
    fn hash_derives_from_name() {
        let desc = sample_descriptor();
        assert_eq!(desc.type_hash(), TypeHash::from_name("Sample.Counter"));
    }
}
