//! Implicit bindings inferred from class names.

use std::sync::Arc;

use tracing::debug;

use crate::helpers::ClassProvider;
use crate::{Binding, BindingKey, Class, Injector};

/// Derive the default arg name of a class from its "UpperCamelCase" name.
///
/// A single leading underscore is ignored. Each word starts with an uppercase letter followed by
/// lowercase letters or digits; the words are lowercased and joined with underscores.
/// Names that do not follow this pattern yield no arg name at all.
///
/// ```
/// # use kizuna::infer_arg_name_from_class_name;
/// assert_eq!(infer_arg_name_from_class_name("FooBarBaz"), vec!["foo_bar_baz"]);
/// assert!(infer_arg_name_from_class_name("notAllCamelCase").is_empty());
/// ```
pub fn infer_arg_name_from_class_name(class_name: &str) -> Vec<String> {
    let name = class_name.strip_prefix('_').unwrap_or(class_name);
    let mut words: Vec<String> = Vec::new();
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            words.push(c.to_ascii_lowercase().to_string());
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            match words.last_mut() {
                Some(word) => word.push(c),
                None => return Vec::new(),
            }
        } else {
            return Vec::new();
        }
    }
    if words.is_empty() {
        return Vec::new();
    }
    vec![words.join("_")]
}

/// Infer one binding per class using the default naming convention.
///
/// See [get_implicit_bindings_with].
pub fn get_implicit_bindings(classes: &[Class], injector: Arc<dyn Injector>) -> Vec<Binding> {
    get_implicit_bindings_with(classes, injector, infer_arg_name_from_class_name)
}

/// Infer bindings for a list of classes using a custom naming function.
///
/// Each arg name returned for a class is bound to a provider asking the injector for a new
/// instance of that class. Classes without any arg name are skipped.
/// Several classes may share an arg name: the collision only surfaces when the key is resolved.
pub fn get_implicit_bindings_with<F>(
    classes: &[Class],
    injector: Arc<dyn Injector>,
    get_arg_names_from_class_name: F,
) -> Vec<Binding>
where
    F: Fn(&str) -> Vec<String>,
{
    let mut bindings = Vec::new();
    for class in classes {
        let arg_names = get_arg_names_from_class_name(class.name());
        if arg_names.is_empty() {
            debug!(class = class.type_name(), "no arg name inferred, skipping class");
            continue;
        }
        for arg_name in arg_names {
            let provider = ClassProvider::build(injector.clone(), class.clone());
            bindings.push(
                Binding::new(BindingKey::new(arg_name), provider)
                    .with_desc(format!("the class {class}")),
            );
        }
    }
    bindings
}
