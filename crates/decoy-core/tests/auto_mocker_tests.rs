//! AutoMocker Tests
//!
//! End-to-end behavior of stubs, spies, auto-properties and fluent setup
//! against the login sample graph.

use decoy_core::prelude::*;
use decoy_core::ConfigurationError;
use decoy_inject::ResolutionError;
use decoy_test_utils::{class_i_dont_want_to_create, init_tracing, person, LoginSamples};
use pretty_assertions::assert_eq;

fn args(values: &[&str]) -> Vec<Value> {
    values.iter().map(|v| Value::from(*v)).collect()
}

#[test]
fn auto_prop_emulates_data_properties() -> anyhow::Result<()> {
    init_tracing();
    let person = person();
    let mkr = AutoMocker::new();
    mkr.auto_prop(&person);

    let p = mkr.resolve_instance(&person)?;
    p.set("firstname", "FirstName")?;
    p.set("lastname", "LastName")?;

    assert_eq!(p.get("firstname")?, Value::from("FirstName"));
    assert_eq!(p.get("lastname")?, Value::from("LastName"));
    assert!(p.get("fullname")?.is_undefined());
    assert_eq!(mkr.auto_properties().len(), 1);
    Ok(())
}

#[test]
fn auto_prop_bags_are_per_instance() -> anyhow::Result<()> {
    let person = person();
    let mkr = AutoMocker::new();
    mkr.auto_prop(&person);

    let first = mkr.resolve_instance(&person)?;
    let second = mkr.resolve_instance(&person)?;
    first.set("firstname", "A")?;

    assert_eq!(first.get("firstname")?, Value::from("A"));
    assert!(second.get("firstname")?.is_undefined());
    Ok(())
}

#[test]
fn stub_returns_null_from_every_method() -> anyhow::Result<()> {
    let samples = LoginSamples::new();
    let mkr = AutoMocker::new();
    mkr.stub(&samples.service, false);

    let svc = mkr.resolve_instance(&samples.service)?;
    assert!(svc.call("login", &args(&["", ""]))?.is_null());
    assert!(svc.call("logout", &[])?.is_null());
    assert!(svc.get("service_name")?.is_null());
    Ok(())
}

#[test]
fn mock_overrides_a_stubbed_method() -> anyhow::Result<()> {
    let samples = LoginSamples::new();
    let mkr = AutoMocker::new();
    mkr.stub(&samples.service, false);
    let logout = mkr.mock(&samples.service, "logout").returns(true);

    let svc = mkr.resolve_instance(&samples.service)?;
    assert!(svc.call("login", &args(&["", ""]))?.is_null());
    assert_eq!(svc.call("logout", &[])?, Value::Bool(true));
    assert!(logout.was_called());
    Ok(())
}

#[test]
fn mock_survives_a_later_stub() -> anyhow::Result<()> {
    let samples = LoginSamples::new();
    let mkr = AutoMocker::new();
    mkr.mock(&samples.service, "logout").returns(true);
    mkr.stub(&samples.service, true);

    let svc = mkr.resolve_instance(&samples.service)?;
    assert_eq!(svc.call("logout", &[])?, Value::Bool(true));
    Ok(())
}

#[test]
fn mock_is_memoized_per_member() -> anyhow::Result<()> {
    let samples = LoginSamples::new();
    let mkr = AutoMocker::new();
    let first = mkr.mock(&samples.service, "login");
    let second = mkr.mock(&samples.service, "login");
    assert!(first.ptr_eq(&second));

    second.returns("configured later");
    let svc = mkr.resolve_instance(&samples.service)?;
    assert_eq!(svc.call("login", &[])?, Value::from("configured later"));
    assert_eq!(first.call_count(), 1);
    Ok(())
}

#[test]
fn get_and_set_spies_are_distinct() {
    let person = person();
    let mkr = AutoMocker::new();
    let get = mkr.get(&person, "firstname");
    let set = mkr.set(&person, "firstname");
    let method = mkr.mock(&person, "firstname");

    assert!(!get.ptr_eq(&set));
    assert!(!get.ptr_eq(&method));
    assert!(get.ptr_eq(&mkr.get(&person, "firstname")));
    assert_eq!(mkr.spies().len(), 3);
}

#[test]
fn set_spy_is_memoized_per_member() -> anyhow::Result<()> {
    let person = person();
    let mkr = AutoMocker::new();
    let first = mkr.set(&person, "lastname");
    let second = mkr.set(&person, "lastname");
    assert!(first.ptr_eq(&second));
    assert_eq!(mkr.spies().len(), 1);

    second.calls_through();
    let p = mkr.resolve_instance(&person)?;
    p.set("lastname", "Doe")?;

    assert_eq!(first.call_count(), 1);
    assert_eq!(p.get("lastname")?, Value::from("Doe"));
    Ok(())
}

#[test]
fn factory_cycles_are_reported() {
    let mkr = AutoMocker::new();
    mkr.injector()
        .register_factory("a", |inj| inj.resolve(&TypeKey::named("b")));
    mkr.injector()
        .register_factory("b", |inj| inj.resolve(&TypeKey::named("a")));

    let err = mkr.resolve("a").unwrap_err();
    assert!(matches!(err, ResolutionError::Cycle { .. }));
}

#[test]
fn rules_apply_to_instances_resolved_earlier() -> anyhow::Result<()> {
    let samples = LoginSamples::new();
    let mkr = AutoMocker::new();
    let svc = mkr.resolve_instance(&samples.service)?;
    assert!(svc.call("logout", &[]).is_err());

    mkr.stub(&samples.service, false);
    assert!(svc.call("logout", &[])?.is_null());
    Ok(())
}

#[test]
fn fluent_stub_and_mock() -> anyhow::Result<()> {
    let samples = LoginSamples::new();
    let mkr = AutoMocker::new();
    let spy = mkr
        .for_type(&samples.service)
        .stub(true)
        .mock("login")?
        .returns(true);

    let vm = mkr.resolve_instance(&samples.model)?;
    vm.set("username", "user")?;
    vm.set("password", "pass")?;

    assert_eq!(vm.call("submit", &[])?, Value::Bool(true));
    assert_eq!(spy.call_count(), 1);
    assert!(spy.was_called_with(&args(&["user", "pass"])));
    Ok(())
}

#[test]
fn mock_with_selector() -> anyhow::Result<()> {
    let samples = LoginSamples::new();
    let mkr = AutoMocker::new();
    let mk_login = mkr.for_type(&samples.service);
    mk_login.stub(true);
    let spy_login = mk_login.mock(selector!(|c| c.login))?.returns(true);

    let vm = mkr.resolve_instance(&samples.model)?;
    vm.set("username", "user")?;
    vm.set("password", "pass")?;

    assert_eq!(vm.call("submit", &[])?, Value::Bool(true));
    assert!(spy_login.was_called());
    Ok(())
}

#[test]
fn get_overrides_a_property_default() -> anyhow::Result<()> {
    let samples = LoginSamples::new();
    let mkr = AutoMocker::new();
    mkr.for_type(&samples.service)
        .get(selector!(|c: LoginService| c.service_name))?
        .returns("Override");

    let vm = mkr.resolve_instance(&samples.model)?;
    assert_eq!(vm.call("get_service_name", &[])?, Value::from("Override"));
    Ok(())
}

#[test]
fn get_spy_records_reads() -> anyhow::Result<()> {
    let person = person();
    let mkr = AutoMocker::new();
    let spy = mkr
        .for_type(&person)
        .get(selector!(|p| p.firstname))?
        .returns("Setup");

    let p = mkr.resolve_instance(&person)?;
    assert_eq!(p.get("firstname")?, Value::from("Setup"));
    assert!(spy.was_called());
    Ok(())
}

#[test]
fn set_spy_records_writes() -> anyhow::Result<()> {
    let person = person();
    let mkr = AutoMocker::new();
    let spy = mkr.for_type(&person).set(selector!(|p| p.firstname))?;

    let p = mkr.resolve_instance(&person)?;
    p.set("firstname", "...something new")?;

    assert!(spy.was_called_with(&args(&["...something new"])));
    assert!(p.get("firstname")?.is_undefined());
    Ok(())
}

#[test]
fn stubbed_properties_read_null_after_writes() -> anyhow::Result<()> {
    let person = person();
    let mkr = AutoMocker::new();
    mkr.for_type(&person).stub(false);

    let p = mkr.resolve_instance(&person)?;
    p.set("firstname", "...something new")?;
    let read = p.get("firstname")?;
    assert!(read.is_null());
    assert!(!read.is_truthy());
    Ok(())
}

#[test]
fn stub_after_auto_prop_replaces_wildcards() -> anyhow::Result<()> {
    let person = person();
    let mkr = AutoMocker::new();
    mkr.auto_prop(&person).stub(&person, false);

    let p = mkr.resolve_instance(&person)?;
    p.set("firstname", "A")?;
    assert!(p.get("firstname")?.is_null());
    Ok(())
}

#[test]
fn mocked_methods_receive_the_exact_arguments() -> anyhow::Result<()> {
    let samples = LoginSamples::new();
    let mkr = AutoMocker::new();
    let spy = mkr
        .for_type(&samples.service)
        .mock(selector!(|p| p.login))?
        .returns(true);

    let svc = mkr.resolve_instance(&samples.service)?;
    assert_eq!(svc.call("login", &args(&["test", "method"]))?, Value::Bool(true));
    assert!(spy.was_called_with(&args(&["test", "method"])));
    mkr.verify(&spy, Expectation::called_with(args(&["test", "method"])));
    mkr.verify_all()?;
    Ok(())
}

#[test]
fn stubbing_a_type_with_dependencies_still_resolves() -> anyhow::Result<()> {
    let samples = LoginSamples::new();
    let mkr = AutoMocker::new();
    let t = mkr.for_type(&samples.model);
    t.stub(false);
    t.mock("is_valid")?.returns(true);

    let vm = mkr.resolve_instance(&samples.model)?;
    assert_eq!(vm.call("is_valid", &[])?, Value::Bool(true));
    assert!(vm.call("submit", &[])?.is_null());
    Ok(())
}

#[test]
fn pure_proxy_skips_the_constructor() -> anyhow::Result<()> {
    let class = class_i_dont_want_to_create();
    let mkr = AutoMocker::new();
    mkr.for_type(&class)
        .pure_proxy(false)?
        .mock(selector!(|t| t.throw_error))?
        .returns(1);

    let obj = mkr.resolve_instance(&class)?;
    assert_eq!(obj.call("throw_error", &[])?, Value::Int(1));
    Ok(())
}

#[test]
fn pure_proxy_of_a_named_key_is_rejected() {
    let mkr = AutoMocker::new();
    mkr.injector().register_value("settings", "real");

    let err = mkr.for_type("settings").pure_proxy(true).unwrap_err();
    assert!(matches!(
        err,
        MockError::Configuration(ConfigurationError::NotAClass { .. })
    ));
    assert_eq!(mkr.resolve("settings").unwrap(), Value::from("real"));
}

#[test]
fn constructor_faults_reach_the_caller_unchanged() {
    let class = class_i_dont_want_to_create();
    let mkr = AutoMocker::new();
    let err = mkr.resolve(&class).unwrap_err();

    assert!(matches!(err, ResolutionError::Construction { .. }));
    assert_eq!(err.thrown(), Some(&ObjectError::thrown("Dont call this")));
}

#[test]
fn mocked_method_faults_reach_the_caller_unchanged() -> anyhow::Result<()> {
    let samples = LoginSamples::new();
    let mkr = AutoMocker::new();
    mkr.mock(&samples.service, "login").throws("offline");

    let vm = mkr.resolve_instance(&samples.model)?;
    vm.set("username", "u")?;
    vm.set("password", "p")?;
    assert_eq!(vm.call("submit", &[]).unwrap_err(), ObjectError::thrown("offline"));
    Ok(())
}

#[test]
fn verify_all_reports_every_failure() -> anyhow::Result<()> {
    let samples = LoginSamples::new();
    let mkr = AutoMocker::new();
    let t = mkr.for_type(&samples.service);
    t.stub(false);
    t.mock_with("login", |spy, verify| {
        spy.returns(false);
        verify.expect(Expectation::Called);
    })?;
    let logout = t.mock("logout")?;
    mkr.verify(&logout, Expectation::NotCalled);

    let err = mkr.verify_all().unwrap_err();
    match err {
        MockError::Verification(failure) => assert_eq!(failure.count(), 1),
        other => panic!("unexpected error: {other}"),
    }

    mkr.resolve_instance(&samples.service)?.call("login", &[])?;
    mkr.verify_all()?;
    Ok(())
}

#[test]
fn for_type_with_runs_the_setup() -> anyhow::Result<()> {
    let samples = LoginSamples::new();
    let mkr = AutoMocker::new();
    let t = mkr.for_type_with(&samples.service, |t| {
        t.stub(true);
        t.get("service_name")?.returns("from setup");
        Ok(())
    })?;
    assert_eq!(t.key(), &TypeKey::from(&samples.service));

    let svc = mkr.resolve_instance(&samples.service)?;
    assert_eq!(svc.get("service_name")?, Value::from("from setup"));
    Ok(())
}

#[test]
fn setup_errors_propagate_out_of_for_type_with() {
    let samples = LoginSamples::new();
    let mkr = AutoMocker::new();
    let err = mkr
        .for_type_with(&samples.service, |t| {
            t.mock(selector!(|a| b.login))?;
            Ok(())
        })
        .unwrap_err();
    assert!(matches!(err, MockError::Selector(_)));
}
