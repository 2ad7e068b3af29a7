//! Wildcard rule installation
//!
//! Stub mode answers every method call and property read with `Null` and
//! discards writes. Auto-property mode routes property reads and writes
//! through the instance's [`AutoPropertyBag`](crate::AutoPropertyBag).
//!
//! Only wildcard rules are touched here, so member rules installed by
//! `mock`/`get`/`set` keep precedence whichever mode was installed last.

use crate::auto_prop::AutoPropertyStore;
use decoy_object::{Member, ProxyHandle, Value};
use std::sync::{Arc, Weak};

/// Stub every method; stub or auto-prop every property
pub fn install_stub(proxy: &ProxyHandle, props: &Arc<AutoPropertyStore>, auto_prop: bool) {
    tracing::debug!(key = proxy.table().label(), auto_prop, "installing stub");
    proxy
        .method(Member::Wildcard)
        .instead(|_, _, _| Ok(Value::Null));
    if auto_prop {
        install_auto_prop(proxy, props);
    } else {
        proxy.get(Member::Wildcard).instead(|_, _| Ok(Value::Null));
        proxy.set(Member::Wildcard).instead(|_, _, _| Ok(()));
    }
}

/// Emulate plain data properties on every instance of the key
///
/// Rules hold the store weakly: once the engine is dropped, reads answer
/// `Undefined` and writes are discarded.
pub fn install_auto_prop(proxy: &ProxyHandle, props: &Arc<AutoPropertyStore>) {
    tracing::debug!(key = proxy.table().label(), "installing auto-properties");
    let store: Weak<AutoPropertyStore> = Arc::downgrade(props);
    proxy.get(Member::Wildcard).instead(move |obj, property| {
        Ok(store
            .upgrade()
            .map(|s| s.read(obj.id(), property))
            .unwrap_or_default())
    });
    let store = Arc::downgrade(props);
    proxy.set(Member::Wildcard).instead(move |obj, property, value| {
        if let Some(s) = store.upgrade() {
            s.write(obj.id(), property, value);
        }
        Ok(())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use decoy_object::{ClassDef, InterceptTable};
    use pretty_assertions::assert_eq;

    fn service() -> decoy_object::ClassRef {
        ClassDef::builder("Service")
            .field("name", "real")
            .method("run", |_, _| Ok(Value::from("ran")))
            .build()
    }

    fn attached(proxy: &ProxyHandle) -> decoy_object::Instance {
        let obj = service().construct(&[]).unwrap();
        obj.attach(proxy.table().clone());
        obj
    }

    #[test]
    fn stub_nulls_everything() {
        let props = Arc::new(AutoPropertyStore::new());
        let proxy = ProxyHandle::new(InterceptTable::new("Service"));
        install_stub(&proxy, &props, false);
        let obj = attached(&proxy);

        assert!(obj.call("run", &[]).unwrap().is_null());
        assert!(obj.call("undeclared", &[]).unwrap().is_null());
        assert!(obj.get("name").unwrap().is_null());
        obj.set("name", "changed").unwrap();
        assert!(obj.get("name").unwrap().is_null());
        assert_eq!(obj.get_real("name").unwrap(), Value::from("real"));
    }

    #[test]
    fn auto_prop_round_trips_and_defaults_to_undefined() {
        let props = Arc::new(AutoPropertyStore::new());
        let proxy = ProxyHandle::new(InterceptTable::new("Service"));
        install_auto_prop(&proxy, &props);
        let obj = attached(&proxy);

        assert!(obj.get("name").unwrap().is_undefined());
        obj.set("name", "A").unwrap();
        assert_eq!(obj.get("name").unwrap(), Value::from("A"));
        assert_eq!(obj.call("run", &[]).unwrap(), Value::from("ran"));
    }

    #[test]
    fn later_mode_replaces_wildcards_but_not_member_rules() {
        let props = Arc::new(AutoPropertyStore::new());
        let proxy = ProxyHandle::new(InterceptTable::new("Service"));
        proxy.get("name").instead(|_, _| Ok(Value::from("pinned")));
        install_stub(&proxy, &props, false);
        install_auto_prop(&proxy, &props);
        let obj = attached(&proxy);

        assert_eq!(obj.get("name").unwrap(), Value::from("pinned"));
        assert!(obj.get("other").unwrap().is_undefined());
        assert!(obj.call("run", &[]).unwrap().is_null());
    }

    #[test]
    fn dropped_store_answers_undefined() {
        let props = Arc::new(AutoPropertyStore::new());
        let proxy = ProxyHandle::new(InterceptTable::new("Service"));
        install_auto_prop(&proxy, &props);
        let obj = attached(&proxy);
        drop(props);

        obj.set("name", "A").unwrap();
        assert!(obj.get("name").unwrap().is_undefined());
    }
}
