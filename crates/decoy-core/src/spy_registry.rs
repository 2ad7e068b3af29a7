//! Memoized spies
//!
//! At most one spy exists per (key, member, kind) for the lifetime of the
//! registry. The first request creates the spy and installs the member rule
//! that feeds it; later requests return the same spy untouched.

use dashmap::DashMap;
use decoy_inject::Injector;
use decoy_object::{RuleKind, TypeKey, Value};
use decoy_spy::Spy;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SpyKey {
    key: TypeKey,
    member: String,
    kind: RuleKind,
}

/// Spy cache for one engine
#[derive(Debug, Default)]
pub struct SpyRegistry {
    spies: DashMap<SpyKey, Spy>,
}

impl SpyRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spy answering calls of `method`
    ///
    /// Arguments are forwarded to the spy; calling through runs the real
    /// method with them.
    pub fn method(&self, injector: &Injector, key: &TypeKey, method: &str) -> Spy {
        self.get_or_install(key, method, RuleKind::Method, |spy| {
            injector
                .proxy(key)
                .method(method)
                .instead(move |obj, name, args| spy.invoke(args, |args| obj.call_real(name, args)));
        })
    }

    /// Spy answering reads of `property`
    pub fn getter(&self, injector: &Injector, key: &TypeKey, property: &str) -> Spy {
        self.get_or_install(key, property, RuleKind::Get, |spy| {
            injector
                .proxy(key)
                .get(property)
                .instead(move |obj, name| spy.invoke(&[], |_| obj.get_real(name)));
        })
    }

    /// Spy receiving writes of `property` as its sole argument
    ///
    /// The write is discarded unless the spy calls through.
    pub fn setter(&self, injector: &Injector, key: &TypeKey, property: &str) -> Spy {
        self.get_or_install(key, property, RuleKind::Set, |spy| {
            injector
                .proxy(key)
                .set(property)
                .instead(move |obj, name, value| {
                    spy.invoke(&[value], |args| {
                        let written = args.first().cloned().unwrap_or_default();
                        obj.set_real(name, written).map(|()| Value::Undefined)
                    })
                    .map(drop)
                });
        })
    }

    /// Previously created spy, if any
    #[must_use]
    pub fn lookup(&self, key: &TypeKey, member: &str, kind: RuleKind) -> Option<Spy> {
        let probe = SpyKey {
            key: key.clone(),
            member: member.to_string(),
            kind,
        };
        self.spies.get(&probe).map(|spy| spy.value().clone())
    }

    /// Number of spies created
    #[must_use]
    pub fn len(&self) -> usize {
        self.spies.len()
    }

    /// Check whether no spy was created yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spies.is_empty()
    }

    fn get_or_install<F>(&self, key: &TypeKey, member: &str, kind: RuleKind, install: F) -> Spy
    where
        F: FnOnce(Spy),
    {
        let spy_key = SpyKey {
            key: key.clone(),
            member: member.to_string(),
            kind,
        };
        self.spies
            .entry(spy_key)
            .or_insert_with(|| {
                let spy = Spy::new(spy_name(key, member, kind));
                tracing::debug!(spy = spy.name(), "spy created");
                install(spy.clone());
                spy
            })
            .value()
            .clone()
    }
}

fn spy_name(key: &TypeKey, member: &str, kind: RuleKind) -> String {
    match kind {
        RuleKind::Method => format!("{}.{member}", key.name()),
        RuleKind::Get => format!("get {}.{member}", key.name()),
        RuleKind::Set => format!("set {}.{member}", key.name()),
    }
}
