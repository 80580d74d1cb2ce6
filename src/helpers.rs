use std::any::Any;
use std::sync::Arc;

use crate::{BindingError, Class, Injector, Instance, Provide, Provider};

/// Provider returning the same shared instance on every call
pub struct SingletonProvider(Instance);

impl SingletonProvider {
    pub fn build(instance: Instance) -> Provider {
        Arc::new(SingletonProvider(instance))
    }
}

impl Provide for SingletonProvider {
    fn provide(&self) -> Result<Instance, BindingError> {
        Ok(self.0.clone())
    }
}

/// Provider delegating to a closure, called again on every resolution
pub struct FnProvider<F>(F);

impl<F> Provide for FnProvider<F>
where
    F: Fn() -> Result<Instance, BindingError> + Send + Sync,
{
    fn provide(&self) -> Result<Instance, BindingError> {
        (self.0)()
    }
}

/// Provider asking an injector for a fresh instance of a class on every call
pub struct ClassProvider {
    injector: Arc<dyn Injector>,
    class: Class,
}

impl ClassProvider {
    pub fn build(injector: Arc<dyn Injector>, class: Class) -> Provider {
        Arc::new(ClassProvider { injector, class })
    }
}

impl Provide for ClassProvider {
    fn provide(&self) -> Result<Instance, BindingError> {
        self.injector.provide(&self.class)
    }
}

/// Turn an infallible zero-argument function into a [Provider].
///
/// The returned value is wrapped into a new [Instance] on each call.
pub fn provider_fn<T, F>(f: F) -> Provider
where
    T: Any + Send + Sync,
    F: Fn() -> T + Send + Sync + 'static,
{
    Arc::new(FnProvider(move || -> Result<Instance, BindingError> {
        Ok(Arc::new(f()))
    }))
}

/// Turn a fallible zero-argument function into a [Provider].
pub fn try_provider_fn<F>(f: F) -> Provider
where
    F: Fn() -> Result<Instance, BindingError> + Send + Sync + 'static,
{
    Arc::new(FnProvider(f))
}

/// Convert any value into an [Instance], keeping existing instances as they are.
pub(crate) fn into_instance<T: Any + Send + Sync>(value: T) -> Instance {
    let boxed: Box<dyn Any + Send + Sync> = Box::new(value);
    match boxed.downcast::<Instance>() {
        Ok(instance) => *instance,
        Err(other) => Arc::from(other),
    }
}
