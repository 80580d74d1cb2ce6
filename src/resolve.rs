//! Runtime value model shared by bindings, binders and injectors.
//!
//! The binding core never knows the concrete types it wires together:
//!
//! * An [Instance] is a shared, type-erased value produced by a provider.
//!   Consumers downcast it to the type they expect.
//! * A [Class] describes a constructible type. It carries the [TypeId] used by injectors
//!   and the short type name used to infer implicit bindings.
//! * The [Provide] trait is a zero-argument provider function, shared as a [Provider].
//! * The [Injector] trait is the capability to build an instance of a [Class].
//!   Graph construction engines, test stubs and the deferred injector all implement it.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::binding::BindingKey;

/// Shared type-erased value produced by a provider
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Boxed error raised by user providers or external injectors
pub type StdError = Box<dyn std::error::Error + Send + Sync>;

/// Provide an instance on demand.
///
/// A provider may return the same shared instance on every call or build a new one each time.
/// The binding core never caches the result: scoping is left to the graph construction engine.
pub trait Provide: Send + Sync {
    fn provide(&self) -> Result<Instance, BindingError>;
}

/// Shared trait object implementing [Provide]
pub type Provider = Arc<dyn Provide>;

/// Capability to build an instance of a class
pub trait Injector: Send + Sync {
    /// Obtain an instance of the selected class.
    fn provide(&self, class: &Class) -> Result<Instance, BindingError>;
}

/// Descriptor of a constructible type.
///
/// Two descriptors are equal when they describe the same type under the same name.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Class {
    type_id: TypeId,
    type_name: &'static str,
    name: &'static str,
}

impl Class {
    /// Describe the type `T`, named after the last segment of its path.
    pub fn of<T: Any>() -> Self {
        let type_name = type_name::<T>();
        Self {
            type_id: TypeId::of::<T>(),
            type_name,
            name: short_type_name(type_name),
        }
    }

    /// Describe the type `T` under an explicit name.
    pub fn with_name<T: Any>(name: &'static str) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            name,
        }
    }

    /// Short name of the class, used to infer implicit bindings
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Fully qualified type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Check if this class describes the type `T`
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Class").field(&self.type_name).finish()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Strip the module path and generic arguments from a type name
fn short_type_name(type_name: &'static str) -> &'static str {
    let base = match type_name.find('<') {
        Some(idx) => &type_name[..idx],
        None => type_name,
    };
    match base.rfind("::") {
        Some(idx) => &base[idx + 2..],
        None => base,
    }
}

/// Errors triggered while recording or resolving bindings
#[derive(Error, Debug)]
pub enum BindingError {
    #[error("Nothing injectable for {0}")]
    NothingInjectable(BindingKey),
    #[error("Ambiguous binding for {key}: candidates are {}", .candidates.join(", "))]
    AmbiguousBinding {
        key: BindingKey,
        candidates: Vec<String>,
    },
    #[error("No binding target specified when binding the arg name {arg_name}")]
    NoBindingTarget { arg_name: String },
    #[error("Multiple binding targets specified when binding the arg name {arg_name}: {targets}")]
    MultipleBindingTargets { arg_name: String, targets: String },
    #[error("Invalid binding target for the arg name {arg_name}: {reason}")]
    InvalidBindingTarget { arg_name: String, reason: String },
    #[error("Conflicting explicit bindings for {0}")]
    ConflictingExplicitBindings(BindingKey),
    #[error("Deferred injector used before an injector was set")]
    InjectorNotSet,
    #[error("Deferred injector was already set")]
    InjectorAlreadySet,
    #[error("Provider failed: {0}")]
    Provider(#[source] StdError),
}

impl BindingError {
    /// Wrap the failure of a user provider or of an external injector
    pub fn provider(err: impl Into<StdError>) -> Self {
        Self::Provider(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    mod outer {
        pub struct Wrapper<T>(pub T);
    }

    #[test]
    fn short_names_drop_paths_and_generics() {
        assert_eq!(Class::of::<String>().name(), "String");
        assert_eq!(Class::of::<outer::Wrapper<Vec<u8>>>().name(), "Wrapper");
        assert_eq!(Class::of::<u32>().name(), "u32");
    }

    #[test]
    fn explicit_name_keeps_type_identity() {
        let class = Class::with_name::<String>("Text");
        assert_eq!(class.name(), "Text");
        assert!(class.is::<String>());
        assert_ne!(class, Class::of::<String>());
    }
}
