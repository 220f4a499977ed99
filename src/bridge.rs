//! Boundary operations: the seven crossing primitives.
//!
//! [`Bridge`] hosts the four type-level primitives (validate, build,
//! instantiate, release) and the three per-member primitives (read, write,
//! invoke). Descriptors are built by one reflect crossing per distinct
//! type name and cached by [`TypeHash`]; every later crossing validates
//! against the cached descriptor instead of re-deriving shape.
//!
//! Each operation blocks the calling thread until the foreign runtime
//! completes the call. Independent crossings may run on independent
//! native threads; see [`ForeignRuntime`] for the re-entrancy obligation
//! that places on the runtime.

use std::sync::Arc;

use log::{debug, trace, warn};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::descriptor::{Access, DataType, MethodDescriptor, PropertyDescriptor, TypeDescriptor};
use crate::error::{BridgeError, Result};
use crate::handle::LifetimeHandle;
use crate::instance::InstanceRef;
use crate::runtime::{ForeignRuntime, ForeignType, ForeignValue, RuntimeFault, TypeShape};
use crate::type_hash::TypeHash;
use crate::variant::{ValueKind, Variant, VariantList};

/// The reflection-and-invocation bridge over one foreign runtime.
///
/// Descriptors handed out by [`build_type_descriptor`] are immutable and
/// shared; the cache behind them is the only mutable state here, so the
/// bridge itself is safe to share across threads.
///
/// [`build_type_descriptor`]: Bridge::build_type_descriptor
pub struct Bridge {
    runtime: Arc<dyn ForeignRuntime>,
    descriptors: RwLock<FxHashMap<TypeHash, Arc<TypeDescriptor>>>,
}

impl Bridge {
    /// Create a bridge over the given runtime.
    pub fn new(runtime: Arc<dyn ForeignRuntime>) -> Self {
        Self {
            runtime,
            descriptors: RwLock::new(FxHashMap::default()),
        }
    }

    // ------------------------------------------------------------------
    // Type-level primitives
    // ------------------------------------------------------------------

    /// Ask whether the runtime can resolve `name` to a concrete,
    /// instantiable type, without materializing a descriptor.
    ///
    /// Absence is `Ok(false)`, never an error; only infrastructure failure
    /// produces an `Err`.
    pub fn is_type_valid(&self, name: &str) -> Result<bool> {
        self.runtime
            .resolve_type(name)
            .map_err(|fault| BridgeError::Infrastructure(fault.to_string()))
    }

    /// Build (or fetch the cached) descriptor for `name`.
    ///
    /// The first call per distinct name performs one reflect crossing and
    /// populates the full, ordered member set, inherited members flattened
    /// in. Later calls return the same `Arc`, so building twice is a
    /// cache hit rather than a second crossing.
    pub fn build_type_descriptor(&self, name: &str) -> Result<Arc<TypeDescriptor>> {
        let hash = TypeHash::from_name(name);
        if let Some(descriptor) = self.descriptors.read().get(&hash) {
            return Ok(descriptor.clone());
        }

        let shape = self.runtime.reflect_type(name).map_err(|fault| match fault {
            RuntimeFault::Unavailable(msg) => BridgeError::Infrastructure(msg),
            other => BridgeError::Build {
                type_name: name.to_string(),
                reason: other.to_string(),
            },
        })?;
        let descriptor = Arc::new(self.descriptor_from_shape(name, shape)?);

        let mut cache = self.descriptors.write();
        // Another thread may have built the same descriptor while we were
        // reflecting; both results are equivalent, keep the first.
        let entry = cache.entry(hash).or_insert_with(|| {
            debug!(
                "built descriptor for '{}': {} properties, {} methods",
                name,
                descriptor.properties().len(),
                descriptor.methods().len()
            );
            descriptor.clone()
        });
        Ok(entry.clone())
    }

    /// Allocate a new instance of the described type in the foreign
    /// runtime.
    ///
    /// The returned reference owns a freshly minted lifetime claim the
    /// caller must eventually release exactly once.
    pub fn instantiate(&self, descriptor: &Arc<TypeDescriptor>) -> Result<InstanceRef> {
        let token = self
            .runtime
            .instantiate(descriptor.name())
            .map_err(|fault| match fault {
                RuntimeFault::Unavailable(msg) => BridgeError::Infrastructure(msg),
                other => BridgeError::Instantiation {
                    type_name: descriptor.name().to_string(),
                    reason: other.to_string(),
                },
            })?;
        trace!("instantiated '{}' as token {}", descriptor.name(), token);
        Ok(InstanceRef::new(descriptor.clone(), LifetimeHandle::new(token)))
    }

    /// Return a lifetime claim to the foreign runtime's collector.
    ///
    /// The first release retires the handle and forwards the token; a
    /// second release on the same handle is guarded here. It is reported
    /// as [`BridgeError::TargetInvalid`] and is not forwarded, so a
    /// native-side double release can never corrupt the foreign handle
    /// table.
    pub fn release_handle(&self, handle: &LifetimeHandle) -> Result<()> {
        if handle.retire() {
            trace!("released token {}", handle.token());
            self.runtime.release(handle.token());
            Ok(())
        } else {
            warn!("double release of token {}", handle.token());
            Err(BridgeError::TargetInvalid(
                "handle already released".to_string(),
            ))
        }
    }

    // ------------------------------------------------------------------
    // Per-member primitives
    // ------------------------------------------------------------------

    /// Read a property's current value into the output slot.
    ///
    /// An object-typed result arrives with a fresh lifetime claim owned by
    /// the caller.
    pub fn read_property(
        &self,
        property: &PropertyDescriptor,
        target: &InstanceRef,
        out: &mut Variant,
    ) -> Result<()> {
        if !property.is_readable() {
            return Err(BridgeError::AccessViolation {
                property: property.name.clone(),
                required: "readable",
            });
        }
        self.check_target(property.owner, &property.name, target)?;

        let value = self
            .runtime
            .read_member(target.handle().token(), &property.name)
            .map_err(|fault| self.member_fault(fault, &property.name))?;
        *out = self.variant_from_foreign(value)?;
        Ok(())
    }

    /// Push a value into a property of the target.
    ///
    /// The variant's tag must be compatible with the declared type; the
    /// only implicit coercion is integer-to-float widening. An object
    /// argument is borrowed for the crossing, never consumed.
    pub fn write_property(
        &self,
        property: &PropertyDescriptor,
        target: &InstanceRef,
        value: &Variant,
    ) -> Result<()> {
        if !property.is_writable() {
            return Err(BridgeError::AccessViolation {
                property: property.name.clone(),
                required: "writable",
            });
        }
        self.check_target(property.owner, &property.name, target)?;

        let context = format!("{}.{}", target.descriptor().name(), property.name);
        let wire = self.variant_to_foreign(&property.value_type, value, &context)?;
        self.runtime
            .write_member(target.handle().token(), &property.name, wire)
            .map_err(|fault| self.member_fault(fault, &property.name))
    }

    /// Invoke a method on the target and marshal its result (or void) into
    /// the output slot.
    ///
    /// Arity and per-position compatibility are validated against the
    /// descriptor before any foreign call is attempted, so a rejected call
    /// has no partial side effects. A foreign exception raised by the
    /// method surfaces as [`BridgeError::InvocationFault`] carrying the
    /// exception's type name and message verbatim.
    pub fn invoke_method(
        &self,
        method: &MethodDescriptor,
        target: &InstanceRef,
        args: &VariantList,
        out: &mut Variant,
    ) -> Result<()> {
        if args.len() != method.arity() {
            return Err(BridgeError::ArityMismatch {
                method: method.name.clone(),
                expected: method.arity(),
                got: args.len(),
            });
        }
        self.check_target(method.owner, &method.name, target)?;

        let mut wire_args = Vec::with_capacity(args.len());
        for (position, (declared, actual)) in method.params.iter().zip(args.iter()).enumerate() {
            let context = format!("{} argument {}", method.name, position + 1);
            wire_args.push(self.variant_to_foreign(declared, actual, &context)?);
        }

        let result = self
            .runtime
            .invoke(target.handle().token(), &method.name, wire_args)
            .map_err(|fault| self.member_fault(fault, &method.name))?;
        *out = self.variant_from_foreign(result)?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Descriptor population
    // ------------------------------------------------------------------

    fn descriptor_from_shape(&self, name: &str, shape: TypeShape) -> Result<TypeDescriptor> {
        let owner = TypeHash::from_name(name);

        let mut properties = Vec::with_capacity(shape.properties.len());
        for property in shape.properties {
            let value_type = classify(property.value_type, name, &property.name)?;
            let mut access = Access::empty();
            access.set(Access::READ, property.readable);
            access.set(Access::WRITE, property.writable);
            properties.push(PropertyDescriptor {
                name: property.name,
                value_type,
                access,
                owner,
            });
        }

        let mut methods = Vec::with_capacity(shape.methods.len());
        for method in shape.methods {
            let mut params = Vec::with_capacity(method.params.len());
            for param in method.params {
                params.push(classify(param, name, &method.name)?);
            }
            let return_type = classify(method.return_type, name, &method.name)?;
            methods.push(MethodDescriptor {
                name: method.name,
                params,
                return_type,
                owner,
            });
        }

        Ok(TypeDescriptor::new(name, properties, methods))
    }

    // ------------------------------------------------------------------
    // Marshaling
    // ------------------------------------------------------------------

    /// Wrap a value arriving from the foreign side.
    ///
    /// An object value carries a fresh claim; if no descriptor can be
    /// built for its runtime type, the claim is returned to the collector
    /// before the error propagates, so a failed unmarshal never leaks.
    fn variant_from_foreign(&self, value: ForeignValue) -> Result<Variant> {
        Ok(match value {
            ForeignValue::Void => Variant::Void,
            ForeignValue::Bool(v) => Variant::Bool(v),
            ForeignValue::Int(v) => Variant::Int(v),
            ForeignValue::Float(v) => Variant::Float(v),
            ForeignValue::String(v) => Variant::String(v),
            ForeignValue::Null => Variant::Null,
            ForeignValue::Object { handle, type_name } => {
                let descriptor = match self.build_type_descriptor(&type_name) {
                    Ok(descriptor) => descriptor,
                    Err(err) => {
                        self.runtime.release(handle);
                        return Err(err);
                    }
                };
                Variant::Object(InstanceRef::new(descriptor, LifetimeHandle::new(handle)))
            }
        })
    }

    /// Encode a variant for the foreign side against a declared type.
    fn variant_to_foreign(
        &self,
        declared: &DataType,
        value: &Variant,
        context: &str,
    ) -> Result<ForeignValue> {
        let actual = value.kind();
        if !declared.kind.accepts(actual) {
            return Err(BridgeError::TypeMismatch {
                expected: declared.kind,
                actual,
                context: context.to_string(),
            });
        }
        Ok(match value {
            Variant::Void => ForeignValue::Void,
            Variant::Bool(v) => ForeignValue::Bool(*v),
            Variant::Int(v) => {
                if declared.kind == ValueKind::Float {
                    ForeignValue::Float(*v as f64)
                } else {
                    ForeignValue::Int(*v)
                }
            }
            Variant::Float(v) => ForeignValue::Float(*v),
            Variant::String(v) => ForeignValue::String(v.clone()),
            Variant::Null => ForeignValue::Null,
            Variant::Object(instance) => {
                // Borrowed for the call's duration; ownership stays with
                // the caller, so the claim must still be outstanding.
                if !instance.is_live() {
                    return Err(BridgeError::TargetInvalid(format!(
                        "{context} uses a released handle"
                    )));
                }
                ForeignValue::Object {
                    handle: instance.handle().token(),
                    type_name: instance.descriptor().name().to_string(),
                }
            }
        })
    }

    // ------------------------------------------------------------------
    // Precondition and fault plumbing
    // ------------------------------------------------------------------

    /// Target preconditions shared by read/write/invoke: the handle must
    /// still be live and the target's type must own the member.
    fn check_target(&self, owner: TypeHash, member: &str, target: &InstanceRef) -> Result<()> {
        if !target.is_live() {
            return Err(BridgeError::TargetInvalid(format!(
                "target of '{member}' uses a released handle"
            )));
        }
        if target.descriptor().type_hash() != owner {
            return Err(BridgeError::TargetInvalid(format!(
                "target type '{}' does not own member '{member}'",
                target.descriptor().name()
            )));
        }
        Ok(())
    }

    fn member_fault(&self, fault: RuntimeFault, member: &str) -> BridgeError {
        match fault {
            RuntimeFault::Unavailable(msg) => BridgeError::Infrastructure(msg),
            RuntimeFault::StaleHandle => BridgeError::TargetInvalid(format!(
                "foreign runtime reports a stale handle for '{member}'"
            )),
            RuntimeFault::MissingMember(name) => BridgeError::NotFound(name),
            RuntimeFault::Exception { type_name, message } => {
                BridgeError::InvocationFault { type_name, message }
            }
            // Activation faults have no business surfacing from a member
            // crossing; treat them as a broken runtime.
            other => BridgeError::Infrastructure(other.to_string()),
        }
    }
}

/// Map a reflected member type into the closed variant set.
fn classify(foreign: ForeignType, owner: &str, member: &str) -> Result<DataType> {
    Ok(match foreign {
        ForeignType::Void => DataType::void(),
        ForeignType::Bool => DataType::new(ValueKind::Bool, "bool"),
        ForeignType::Int => DataType::new(ValueKind::Int, "int"),
        ForeignType::Float => DataType::new(ValueKind::Float, "float"),
        ForeignType::String => DataType::new(ValueKind::Str, "string"),
        ForeignType::Object(name) => DataType::new(ValueKind::Object, name),
        ForeignType::Other(name) => {
            return Err(BridgeError::UnsupportedType {
                foreign_type: name,
                owner: owner.to_string(),
                member: member.to_string(),
            });
        }
    })
}
