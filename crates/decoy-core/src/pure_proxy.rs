//! Stand-ins allocated without construction

use crate::auto_prop::AutoPropertyStore;
use crate::error::ConfigurationError;
use crate::interceptor;
use decoy_inject::Injector;
use decoy_object::{TypeKey, Value};
use std::sync::Arc;

/// Resolve `key` to bare allocations of its class from now on, stubbed
///
/// The real constructor, field initializers and dependencies are skipped;
/// the class's methods and accessors stay reachable for member rules and
/// for calling through.
///
/// # Errors
/// [`ConfigurationError::NotAClass`] for named keys.
pub fn install(
    injector: &Injector,
    key: &TypeKey,
    props: &Arc<AutoPropertyStore>,
    auto_prop: bool,
) -> Result<(), ConfigurationError> {
    let class = key
        .class()
        .cloned()
        .ok_or_else(|| ConfigurationError::NotAClass {
            key: key.to_string(),
        })?;
    tracing::debug!(%key, auto_prop, "registering pure proxy");
    injector.register_factory(key, move |_| Ok(Value::Object(class.allocate())));
    interceptor::install_stub(&injector.proxy(key), props, auto_prop);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use decoy_object::ClassDef;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn constructor_never_runs() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let class = ClassDef::builder("Costly")
            .field("ready", true)
            .constructor(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .build();
        let injector = Injector::new();
        let key = TypeKey::from(&class);
        let props = Arc::new(AutoPropertyStore::new());

        install(&injector, &key, &props, false).unwrap();
        let obj = injector.resolve_instance(&key).unwrap();

        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(obj.own_fields().is_empty());
        assert!(obj.get("ready").unwrap().is_null());
        assert_eq!(obj.class(), &class);
    }

    #[test]
    fn named_key_is_rejected() {
        let injector = Injector::new();
        let props = Arc::new(AutoPropertyStore::new());
        let err = install(&injector, &TypeKey::named("db"), &props, true).unwrap_err();
        assert!(matches!(err, ConfigurationError::NotAClass { .. }));
        assert!(!injector.is_registered(&TypeKey::named("db")));
    }

    #[test]
    fn auto_prop_mode() {
        let class = ClassDef::builder("Bag").build();
        let injector = Injector::new();
        let key = TypeKey::from(&class);
        let props = Arc::new(AutoPropertyStore::new());

        install(&injector, &key, &props, true).unwrap();
        let obj = injector.resolve_instance(&key).unwrap();
        assert!(obj.get("x").unwrap().is_undefined());
        obj.set("x", 3).unwrap();
        assert_eq!(obj.get("x").unwrap(), Value::Int(3));
        assert!(obj.call("anything", &[]).unwrap().is_null());
    }
}
