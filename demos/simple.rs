use std::any::Any;
use std::sync::{Arc, Weak};
use std::time::SystemTime;

use kizuna::*;
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

// Define regular structs, wired by arg name

struct ConsoleLogger;

impl ConsoleLogger {
    fn log(&self, content: &str) {
        println!("{}", content);
    }
}

struct DateLogger {
    logger: Arc<ConsoleLogger>,
}

impl DateLogger {
    fn log_date(&self) {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();
        self.logger.log(&format!("{}s since epoch", now.as_secs()));
    }
}

// A toy graph standing in for the object graph construction engine

struct Graph {
    mapping: OnceCell<BindingMapping>,
}

impl Graph {
    fn get<T: Any + Send + Sync>(&self, arg_name: &str) -> Result<Arc<T>, BindingError> {
        let mapping = self
            .mapping
            .get()
            .ok_or_else(|| BindingError::provider("the graph is not built yet"))?;
        mapping
            .get_instance(&BindingKey::new(arg_name))?
            .downcast::<T>()
            .map_err(|_| BindingError::provider(format!("{arg_name} has an unexpected type")))
    }
}

impl Injector for Graph {
    fn provide(&self, class: &Class) -> Result<Instance, BindingError> {
        if class.is::<ConsoleLogger>() {
            Ok(Arc::new(ConsoleLogger))
        } else if class.is::<DateLogger>() {
            Ok(Arc::new(DateLogger {
                logger: self.get("console_logger")?,
            }))
        } else {
            Err(BindingError::provider(format!("no constructor for {class}")))
        }
    }
}

/// Injector handed to class bindings.
///
/// The graph owns the mapping and its providers, so they only hold a weak reference back to it.
struct GraphRef(Weak<Graph>);

impl Injector for GraphRef {
    fn provide(&self, class: &Class) -> Result<Instance, BindingError> {
        self.0
            .upgrade()
            .ok_or_else(|| BindingError::provider("the graph was dropped"))?
            .provide(class)
    }
}

fn main() -> Result<(), BindingError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Declare explicit bindings before the graph exists
    let deferred = Arc::new(DeferredInjector::new());
    let mut explicit = Vec::new();
    let mut binder = Binder::new(deferred.clone(), &mut explicit);
    binder.bind("dates", BindOptions::new().to_class(Class::of::<DateLogger>()))?;
    binder.bind(
        "greeting",
        BindOptions::new().to_instance("Hello world".to_string()),
    )?;
    binder.bind(
        "started_at",
        BindOptions::new().to_provider_fn(SystemTime::now),
    )?;

    // Build the graph, then back-fill the deferred injector
    let graph = Arc::new(Graph {
        mapping: OnceCell::new(),
    });
    let injector: Arc<dyn Injector> = Arc::new(GraphRef(Arc::downgrade(&graph)));
    let implicit = get_implicit_bindings(
        &[Class::of::<ConsoleLogger>(), Class::of::<DateLogger>()],
        injector.clone(),
    );
    deferred.set_injector(injector)?;
    graph
        .mapping
        .set(new_binding_mapping(explicit, implicit))
        .map_err(|_| BindingError::provider("the graph was already built"))?;

    let greeting: Arc<String> = graph.get("greeting")?;
    let logger: Arc<ConsoleLogger> = graph.get("console_logger")?;
    logger.log(&greeting);

    let started_at: Arc<SystemTime> = graph.get("started_at")?;
    let dates: Arc<DateLogger> = graph.get("dates")?;
    dates.log_date();
    let elapsed = started_at.elapsed().unwrap_or_default();
    logger.log(&format!("wired in {}us", elapsed.as_micros()));

    Ok(())
}
