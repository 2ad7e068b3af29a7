//! Per-member interception rules
//!
//! Provides [`InterceptTable`], the rule set consulted on every get, set and
//! call of an attached [`Instance`], and [`ProxyHandle`], the registration
//! surface for those rules.
//!
//! # Matching
//! 1. A rule registered for the exact member name
//! 2. Otherwise the wildcard rule of the same kind
//! 3. Otherwise the real member
//!
//! Registering a rule for an existing (member, kind) replaces it.

use crate::error::ObjectError;
use crate::instance::Instance;
use crate::value::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Property-read override: `(receiver, property) -> value`
pub type GetRule = Arc<dyn Fn(&Instance, &str) -> Result<Value, ObjectError> + Send + Sync>;

/// Property-write override: `(receiver, property, value)`
pub type SetRule = Arc<dyn Fn(&Instance, &str, Value) -> Result<(), ObjectError> + Send + Sync>;

/// Method override: `(receiver, method, args) -> value`
pub type MethodRule =
    Arc<dyn Fn(&Instance, &str, &[Value]) -> Result<Value, ObjectError> + Send + Sync>;

/// Which members a rule applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Member {
    /// Exactly this member
    Named(String),
    /// Every member without a more specific rule
    Wildcard,
}

impl Member {
    /// Create a named member
    #[inline]
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{n}"),
            Self::Wildcard => write!(f, "*"),
        }
    }
}

impl From<&str> for Member {
    fn from(s: &str) -> Self {
        Self::Named(s.to_string())
    }
}

impl From<String> for Member {
    fn from(s: String) -> Self {
        Self::Named(s)
    }
}

/// Rule kind, for diagnostics and counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Property read
    Get,
    /// Property write
    Set,
    /// Method call
    Method,
}

#[derive(Default)]
struct Rules {
    get: HashMap<Member, GetRule>,
    set: HashMap<Member, SetRule>,
    method: HashMap<Member, MethodRule>,
}

/// Shared rule table for one resolution key
///
/// Cloning shares the table, so rules added after an instance was attached
/// still apply to that instance.
#[derive(Clone)]
pub struct InterceptTable {
    label: Arc<str>,
    rules: Arc<RwLock<Rules>>,
}

impl InterceptTable {
    /// Create an empty table labelled for diagnostics
    #[must_use]
    pub fn new(label: impl AsRef<str>) -> Self {
        Self {
            label: Arc::from(label.as_ref()),
            rules: Arc::default(),
        }
    }

    /// Diagnostic label (usually the key name)
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Identity comparison
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rules, &other.rules)
    }

    /// Rule answering a read of `property`
    #[must_use]
    pub fn get_rule(&self, property: &str) -> Option<GetRule> {
        let rules = self.rules.read();
        lookup(&rules.get, property)
    }

    /// Rule answering a write of `property`
    #[must_use]
    pub fn set_rule(&self, property: &str) -> Option<SetRule> {
        let rules = self.rules.read();
        lookup(&rules.set, property)
    }

    /// Rule answering a call of `method`
    #[must_use]
    pub fn method_rule(&self, method: &str) -> Option<MethodRule> {
        let rules = self.rules.read();
        lookup(&rules.method, method)
    }

    /// Check whether a rule of `kind` is registered for exactly `member`
    #[must_use]
    pub fn has_rule(&self, kind: RuleKind, member: &Member) -> bool {
        let rules = self.rules.read();
        match kind {
            RuleKind::Get => rules.get.contains_key(member),
            RuleKind::Set => rules.set.contains_key(member),
            RuleKind::Method => rules.method.contains_key(member),
        }
    }

    /// Total number of registered rules
    #[must_use]
    pub fn rule_count(&self) -> usize {
        let rules = self.rules.read();
        rules.get.len() + rules.set.len() + rules.method.len()
    }

    fn insert_get(&self, member: Member, rule: GetRule) {
        tracing::trace!(table = %self.label, %member, "get rule registered");
        self.rules.write().get.insert(member, rule);
    }

    fn insert_set(&self, member: Member, rule: SetRule) {
        tracing::trace!(table = %self.label, %member, "set rule registered");
        self.rules.write().set.insert(member, rule);
    }

    fn insert_method(&self, member: Member, rule: MethodRule) {
        tracing::trace!(table = %self.label, %member, "method rule registered");
        self.rules.write().method.insert(member, rule);
    }
}

fn lookup<R: Clone>(map: &HashMap<Member, R>, name: &str) -> Option<R> {
    map.get(&Member::Named(name.to_string()))
        .or_else(|| map.get(&Member::Wildcard))
        .cloned()
}

impl fmt::Debug for InterceptTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rules = self.rules.read();
        f.debug_struct("InterceptTable")
            .field("label", &self.label)
            .field("get", &rules.get.keys().collect::<Vec<_>>())
            .field("set", &rules.set.keys().collect::<Vec<_>>())
            .field("method", &rules.method.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Registration surface over an [`InterceptTable`]
///
/// ```
/// use decoy_object::{InterceptTable, Member, ProxyHandle, Value};
///
/// let proxy = ProxyHandle::new(InterceptTable::new("Service"));
/// proxy.method(Member::Wildcard).instead(|_, _, _| Ok(Value::Null));
/// proxy.get("name").instead(|_, _| Ok(Value::from("stub")));
/// ```
#[derive(Debug, Clone)]
pub struct ProxyHandle {
    table: InterceptTable,
}

impl ProxyHandle {
    /// Wrap a table
    #[inline]
    #[must_use]
    pub fn new(table: InterceptTable) -> Self {
        Self { table }
    }

    /// Underlying table
    #[inline]
    #[must_use]
    pub fn table(&self) -> &InterceptTable {
        &self.table
    }

    /// Start a property-read rule
    #[inline]
    pub fn get(&self, member: impl Into<Member>) -> GetIntercept<'_> {
        GetIntercept {
            table: &self.table,
            member: member.into(),
        }
    }

    /// Start a property-write rule
    #[inline]
    pub fn set(&self, member: impl Into<Member>) -> SetIntercept<'_> {
        SetIntercept {
            table: &self.table,
            member: member.into(),
        }
    }

    /// Start a method rule
    #[inline]
    pub fn method(&self, member: impl Into<Member>) -> MethodIntercept<'_> {
        MethodIntercept {
            table: &self.table,
            member: member.into(),
        }
    }
}

/// Pending property-read rule
#[must_use = "the rule is only registered by `instead`"]
pub struct GetIntercept<'a> {
    table: &'a InterceptTable,
    member: Member,
}

impl GetIntercept<'_> {
    /// Answer reads with `f`
    pub fn instead<F>(self, f: F)
    where
        F: Fn(&Instance, &str) -> Result<Value, ObjectError> + Send + Sync + 'static,
    {
        self.table.insert_get(self.member, Arc::new(f));
    }
}

/// Pending property-write rule
#[must_use = "the rule is only registered by `instead`"]
pub struct SetIntercept<'a> {
    table: &'a InterceptTable,
    member: Member,
}

impl SetIntercept<'_> {
    /// Route writes to `f`
    pub fn instead<F>(self, f: F)
    where
        F: Fn(&Instance, &str, Value) -> Result<(), ObjectError> + Send + Sync + 'static,
    {
        self.table.insert_set(self.member, Arc::new(f));
    }
}

/// Pending method rule
#[must_use = "the rule is only registered by `instead`"]
pub struct MethodIntercept<'a> {
    table: &'a InterceptTable,
    member: Member,
}

impl MethodIntercept<'_> {
    /// Answer calls with `f`
    pub fn instead<F>(self, f: F)
    where
        F: Fn(&Instance, &str, &[Value]) -> Result<Value, ObjectError> + Send + Sync + 'static,
    {
        self.table.insert_method(self.member, Arc::new(f));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::ClassDef;

    fn receiver() -> Instance {
        ClassDef::builder("Receiver").build().allocate()
    }

    #[test]
    fn specific_rule_beats_wildcard() {
        let proxy = ProxyHandle::new(InterceptTable::new("T"));
        proxy.get(Member::Wildcard).instead(|_, _| Ok(Value::Null));
        proxy.get("name").instead(|_, _| Ok(Value::from("specific")));

        let obj = receiver();
        let table = proxy.table();
        assert_eq!(table.get_rule("name").unwrap()(&obj, "name").unwrap(), Value::from("specific"));
        assert_eq!(table.get_rule("other").unwrap()(&obj, "other").unwrap(), Value::Null);
    }

    #[test]
    fn last_registration_wins() {
        let proxy = ProxyHandle::new(InterceptTable::new("T"));
        proxy.method("run").instead(|_, _, _| Ok(Value::Int(1)));
        proxy.method("run").instead(|_, _, _| Ok(Value::Int(2)));

        let obj = receiver();
        let rule = proxy.table().method_rule("run").unwrap();
        assert_eq!(rule(&obj, "run", &[]).unwrap(), Value::Int(2));
        assert_eq!(proxy.table().rule_count(), 1);
    }

    #[test]
    fn no_rule_without_registration() {
        let table = InterceptTable::new("T");
        assert!(table.get_rule("x").is_none());
        assert!(table.set_rule("x").is_none());
        assert!(table.method_rule("x").is_none());
    }

    #[test]
    fn clones_share_rules() {
        let table = InterceptTable::new("T");
        let proxy = ProxyHandle::new(table.clone());
        proxy.set("x").instead(|_, _, _| Ok(()));
        assert!(table.has_rule(RuleKind::Set, &Member::named("x")));
        assert!(table.ptr_eq(proxy.table()));
    }
}
