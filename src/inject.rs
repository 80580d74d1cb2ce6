use std::any::Any;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::helpers::{into_instance, provider_fn, ClassProvider, SingletonProvider};
use crate::{Binding, BindingError, BindingKey, Class, Injector, Instance, Provider};

/// Forward reference to an injector that does not exist yet.
///
/// Class bindings are recorded against this placeholder before the real injector is built.
/// The injector must be set exactly once, before any dependent provider is invoked.
#[derive(Default)]
pub struct DeferredInjector {
    injector: OnceCell<Arc<dyn Injector>>,
}

impl DeferredInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back-fill the placeholder.
    ///
    /// Return an error if an injector was already set.
    pub fn set_injector(&self, injector: Arc<dyn Injector>) -> Result<(), BindingError> {
        self.injector
            .set(injector)
            .map_err(|_| BindingError::InjectorAlreadySet)?;
        debug!("deferred injector is now set");
        Ok(())
    }

    pub fn is_set(&self) -> bool {
        self.injector.get().is_some()
    }
}

impl Injector for DeferredInjector {
    fn provide(&self, class: &Class) -> Result<Instance, BindingError> {
        self.injector
            .get()
            .ok_or(BindingError::InjectorNotSet)?
            .provide(class)
    }
}

impl fmt::Debug for DeferredInjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredInjector")
            .field("is_set", &self.is_set())
            .finish()
    }
}

/// Target options of [Binder::bind].
///
/// Exactly one of `to_class`, `to_instance` and `to_provider` must be selected.
/// Targets are checked when the binding is recorded, not when these options are built.
#[derive(Default)]
pub struct BindOptions {
    to_class: Option<Instance>,
    to_instance: Option<Instance>,
    to_provider: Option<Instance>,
    annotation: Option<String>,
}

#[allow(clippy::wrong_self_convention)]
impl BindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to new instances of a class, which must be a [Class] descriptor
    pub fn to_class(mut self, class: impl Any + Send + Sync) -> Self {
        self.to_class = Some(into_instance(class));
        self
    }

    /// Bind to a fixed value, returned by reference on every resolution.
    ///
    /// An existing [Instance] is shared as is and resolves to the same allocation.
    /// Any other value is moved into a new [Instance]: binding an `Arc<T>` resolves to an
    /// instance downcasting to `Arc<T>`, not to `T`. Coerce it to an [Instance] first to share
    /// the `T` allocation itself.
    pub fn to_instance(mut self, instance: impl Any + Send + Sync) -> Self {
        self.to_instance = Some(into_instance(instance));
        self
    }

    /// Bind to a provider value, which must be a [Provider].
    ///
    /// Use [BindOptions::to_provider_fn] for plain closures and function pointers.
    pub fn to_provider(mut self, provider: impl Any + Send + Sync) -> Self {
        self.to_provider = Some(into_instance(provider));
        self
    }

    /// Bind to a zero-argument function, called again on every resolution
    pub fn to_provider_fn<T, F>(mut self, f: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.to_provider = Some(into_instance(provider_fn(f)));
        self
    }

    /// Qualify the bound arg name with an annotation
    pub fn annotated_with(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }
}

/// Record explicit bindings into a collection owned by the caller.
///
/// Class bindings go through the deferred injector and are only resolved when their provider
/// is invoked, so they can be declared before the injector exists.
pub struct Binder<'a> {
    injector: Arc<DeferredInjector>,
    collected_bindings: &'a mut Vec<Binding>,
}

impl<'a> Binder<'a> {
    pub fn new(injector: Arc<DeferredInjector>, collected_bindings: &'a mut Vec<Binding>) -> Self {
        Self {
            injector,
            collected_bindings,
        }
    }

    /// Bind an arg name to the selected target.
    ///
    /// Return an error if the options do not select exactly one valid target,
    /// or if the same key was already bound.
    pub fn bind(&mut self, arg_name: &str, options: BindOptions) -> Result<(), BindingError> {
        let BindOptions {
            to_class,
            to_instance,
            to_provider,
            annotation,
        } = options;

        let (provider, desc) = match (to_class, to_instance, to_provider) {
            (Some(target), None, None) => {
                let class = (*target).downcast_ref::<Class>().cloned().ok_or_else(|| {
                    BindingError::InvalidBindingTarget {
                        arg_name: arg_name.to_string(),
                        reason: "to_class expects a class".to_string(),
                    }
                })?;
                let desc = format!("the class {class}");
                let injector: Arc<dyn Injector> = self.injector.clone();
                (ClassProvider::build(injector, class), desc)
            }
            (None, Some(instance), None) => {
                (SingletonProvider::build(instance), "an instance".to_string())
            }
            (None, None, Some(target)) => {
                let provider = (*target).downcast_ref::<Provider>().cloned().ok_or_else(|| {
                    BindingError::InvalidBindingTarget {
                        arg_name: arg_name.to_string(),
                        reason: "to_provider expects a Provider, use to_provider_fn for plain functions"
                            .to_string(),
                    }
                })?;
                (provider, "a provider".to_string())
            }
            (None, None, None) => {
                return Err(BindingError::NoBindingTarget {
                    arg_name: arg_name.to_string(),
                })
            }
            (to_class, to_instance, to_provider) => {
                let targets: Vec<&str> = [
                    ("to_class", to_class.is_some()),
                    ("to_instance", to_instance.is_some()),
                    ("to_provider", to_provider.is_some()),
                ]
                .into_iter()
                .filter_map(|(name, is_set)| is_set.then_some(name))
                .collect();
                return Err(BindingError::MultipleBindingTargets {
                    arg_name: arg_name.to_string(),
                    targets: targets.join(", "),
                });
            }
        };

        let binding_key = match annotation {
            Some(annotation) => BindingKey::annotated(arg_name, annotation),
            None => BindingKey::new(arg_name),
        };
        if self
            .collected_bindings
            .iter()
            .any(|binding| binding.binding_key == binding_key)
        {
            return Err(BindingError::ConflictingExplicitBindings(binding_key));
        }
        debug!(key = %binding_key, target = %desc, "recorded explicit binding");
        self.collected_bindings
            .push(Binding::new(binding_key, provider).with_desc(desc));
        Ok(())
    }
}
