//! Binding keys, bindings and the validated mapping between them.
//!
//! A [BindingMapping] is built once from the explicit bindings recorded by a [crate::Binder]
//! and the implicit bindings inferred from class names. Collisions are only reported when a
//! key is looked up, so that an explicit binding can still disambiguate colliding classes.

use std::collections::hash_map::{Entry, HashMap};
use std::fmt;

use tracing::{trace, warn};

use crate::{BindingError, Instance, Provider};

/// Identity of a requested dependency
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BindingKey {
    WithoutAnnotation { arg_name: String },
    WithAnnotation { arg_name: String, annotation: String },
}

impl BindingKey {
    /// Key for an arg name without annotation
    pub fn new(arg_name: impl Into<String>) -> Self {
        Self::WithoutAnnotation {
            arg_name: arg_name.into(),
        }
    }

    /// Key for an arg name qualified by an annotation
    pub fn annotated(arg_name: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self::WithAnnotation {
            arg_name: arg_name.into(),
            annotation: annotation.into(),
        }
    }

    pub fn arg_name(&self) -> &str {
        match self {
            Self::WithoutAnnotation { arg_name } | Self::WithAnnotation { arg_name, .. } => arg_name,
        }
    }

    pub fn annotation(&self) -> Option<&str> {
        match self {
            Self::WithoutAnnotation { .. } => None,
            Self::WithAnnotation { annotation, .. } => Some(annotation.as_str()),
        }
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WithoutAnnotation { arg_name } => write!(f, "the arg name {arg_name}"),
            Self::WithAnnotation {
                arg_name,
                annotation,
            } => write!(f, "the arg name {arg_name} annotated with {annotation}"),
        }
    }
}

/// Association of a binding key to a zero-argument provider
#[derive(Clone)]
pub struct Binding {
    pub binding_key: BindingKey,
    pub provider_fn: Provider,
    desc: String,
}

impl Binding {
    pub fn new(binding_key: BindingKey, provider_fn: Provider) -> Self {
        Self {
            binding_key,
            provider_fn,
            desc: "a provider".to_string(),
        }
    }

    /// Describe the origin of the bound value, used in error messages
    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// Invoke the provider function
    pub fn provide(&self) -> Result<Instance, BindingError> {
        self.provider_fn.provide()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("binding_key", &self.binding_key)
            .field("desc", &self.desc)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct BindingSlot {
    explicit: Option<Binding>,
    implicit: Vec<Binding>,
}

/// Validated index from binding keys to bindings
pub struct BindingMapping {
    slots: HashMap<BindingKey, BindingSlot>,
}

/// Build a mapping from explicit and implicit bindings.
///
/// Only the first explicit binding is kept for a given key.
/// Implicit bindings are all kept, colliding keys are reported by [BindingMapping::get_instance].
pub fn new_binding_mapping(
    explicit_bindings: Vec<Binding>,
    implicit_bindings: Vec<Binding>,
) -> BindingMapping {
    let mut slots: HashMap<BindingKey, BindingSlot> = HashMap::new();
    for binding in explicit_bindings {
        let slot = slots.entry(binding.binding_key.clone()).or_default();
        match slot.explicit {
            Some(ref kept) => warn!(
                key = %binding.binding_key,
                kept = kept.desc(),
                ignored = binding.desc(),
                "ignoring duplicate explicit binding"
            ),
            None => slot.explicit = Some(binding),
        }
    }
    for binding in implicit_bindings {
        match slots.entry(binding.binding_key.clone()) {
            Entry::Occupied(mut o) => o.get_mut().implicit.push(binding),
            Entry::Vacant(v) => {
                v.insert(BindingSlot {
                    explicit: None,
                    implicit: vec![binding],
                });
            }
        }
    }
    BindingMapping { slots }
}

impl BindingMapping {
    /// Resolve an instance for the selected key.
    ///
    /// Explicit bindings win over implicit ones. The provider is invoked on every call.
    pub fn get_instance(&self, binding_key: &BindingKey) -> Result<Instance, BindingError> {
        let Some(slot) = self.slots.get(binding_key) else {
            return Err(BindingError::NothingInjectable(binding_key.clone()));
        };
        if let Some(binding) = &slot.explicit {
            trace!(key = %binding_key, source = binding.desc(), "resolving explicit binding");
            return binding.provide();
        }
        match slot.implicit.as_slice() {
            [] => Err(BindingError::NothingInjectable(binding_key.clone())),
            [binding] => {
                trace!(key = %binding_key, source = binding.desc(), "resolving implicit binding");
                binding.provide()
            }
            colliding => Err(BindingError::AmbiguousBinding {
                key: binding_key.clone(),
                candidates: colliding.iter().map(|b| b.desc().to_string()).collect(),
            }),
        }
    }

    /// Check if at least one binding exists for the key, even an ambiguous one
    pub fn contains(&self, binding_key: &BindingKey) -> bool {
        self.slots.contains_key(binding_key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &BindingKey> {
        self.slots.keys()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for BindingMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.slots.keys()).finish()
    }
}
