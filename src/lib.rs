//! Binding resolution core of a runtime dependency injection engine.
//!
//! Dependencies are requested by arg name. This crate maps arg names to zero-argument providers,
//! either declared explicitly with a [Binder] or inferred from class names.
//! The object graph construction engine consumes the resulting [BindingMapping].
//!
//! # Simple use case
//!
//! ```
//! # use std::sync::Arc;
//! # use kizuna::*;
//! struct Database;
//! struct Config {
//!     url: &'static str,
//! }
//!
//! // The real injector builds instances of classes on demand
//! struct MyInjector;
//!
//! impl Injector for MyInjector {
//!     fn provide(&self, class: &Class) -> Result<Instance, BindingError> {
//!         if class.is::<Database>() {
//!             Ok(Arc::new(Database))
//!         } else {
//!             Err(BindingError::provider(format!("cannot build {class}")))
//!         }
//!     }
//! }
//!
//! # fn main() -> Result<(), BindingError> {
//! // Record explicit bindings before the injector exists
//! let deferred = Arc::new(DeferredInjector::new());
//! let mut explicit = Vec::new();
//! let mut binder = Binder::new(deferred.clone(), &mut explicit);
//! binder.bind("config", BindOptions::new().to_instance(Config { url: "sqlite::memory:" }))?;
//! binder.bind("db", BindOptions::new().to_class(Class::of::<Database>()))?;
//!
//! // Infer implicit bindings and back-fill the deferred injector
//! let injector: Arc<dyn Injector> = Arc::new(MyInjector);
//! let implicit = get_implicit_bindings(&[Class::of::<Database>()], injector.clone());
//! deferred.set_injector(injector)?;
//!
//! let mapping = new_binding_mapping(explicit, implicit);
//! let config = mapping.get_instance(&BindingKey::new("config"))?;
//! assert_eq!(config.downcast_ref::<Config>().map(|c| c.url), Some("sqlite::memory:"));
//! assert!(mapping.get_instance(&BindingKey::new("db"))?.is::<Database>());
//! assert!(mapping.get_instance(&BindingKey::new("database"))?.is::<Database>());
//! # Ok(())
//! # }
//! ```
//!
//! # Mechanism
//!
//! * A [BindingKey] identifies a dependency by arg name, optionally qualified by an annotation.
//! * A [Binding] associates a key with a [Provider], a shared zero-argument provider function.
//! * Implicit bindings are inferred from class names by [get_implicit_bindings]:
//!   ```SomeClass``` is bound to ```some_class```.
//! * The [Binder] records explicit bindings to a class, an instance or a provider.
//!   Class bindings go through a [DeferredInjector], set once the real injector is built.
//! * [new_binding_mapping] merges both lists. Explicit bindings win; colliding implicit bindings
//!   are only reported when the ambiguous key is resolved.

mod binding;
mod helpers;
mod implicit;
mod inject;
mod resolve;

pub use binding::{new_binding_mapping, Binding, BindingKey, BindingMapping};
pub use helpers::{provider_fn, try_provider_fn, ClassProvider, FnProvider, SingletonProvider};
pub use implicit::{get_implicit_bindings, get_implicit_bindings_with, infer_arg_name_from_class_name};
pub use inject::{BindOptions, Binder, DeferredInjector};
pub use resolve::{BindingError, Class, Injector, Instance, Provide, Provider, StdError};
