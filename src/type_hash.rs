//! Deterministic hash-based type identity.
//!
//! Foreign type names are dot-qualified strings chosen by the foreign
//! runtime. Descriptors are keyed by [`TypeHash`], a 64-bit hash computed
//! deterministically from the qualified name: same name, same hash, no
//! registration-order dependency and no secondary name-to-id map.
//!
//! Uses XXHash64 with domain-separation constants so a type named `Foo`
//! and an unrelated entity named `Foo` can never collide.

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-separation constants mixed into hash computation.
mod hash_constants {
    /// Separator constant between namespace path components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;
}

/// A deterministic 64-bit hash identifying one foreign type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a dot-qualified foreign type name.
    ///
    /// The namespace path is hashed component-wise with a separator
    /// constant, so `A.B` and `AB` hash differently even though their
    /// concatenated bytes would not.
    pub fn from_name(qualified_name: &str) -> Self {
        let mut acc = hash_constants::TYPE;
        for component in qualified_name.split('.') {
            acc = acc
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(xxh64(component.as_bytes(), hash_constants::SEP));
        }
        TypeHash(acc)
    }

    /// Whether this is the empty/invalid hash.
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_same_hash() {
        assert_eq!(
            TypeHash::from_name("Sample.Counter"),
            TypeHash::from_name("Sample.Counter")
        );
    }

    #[test]
    fn different_names_differ() {
        assert_ne!(
            TypeHash::from_name("Sample.Counter"),
            TypeHash::from_name("Sample.Timer")
        );
    }

    #[test]
    fn namespace_components_are_separated() {
        // "A.B" must not collide with "AB" or "A.B.C" prefixes.
        assert_ne!(TypeHash::from_name("A.B"), TypeHash::from_name("AB"));
        assert_ne!(TypeHash::from_name("A.B"), TypeHash::from_name("A.B.C"));
    }

    #[test]
    fn empty_hash_is_distinct() {
        assert!(TypeHash::EMPTY.is_empty());
        assert!(!TypeHash::from_name("Sample.Counter").is_empty());
    }
}
