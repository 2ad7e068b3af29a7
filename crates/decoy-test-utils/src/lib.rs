//! Testing utilities for decoy workspace
//!
//! Shared sample classes, construction counters and tracing setup.
//!
//! Every constructor here returns a *fresh* class. Class keys compare by
//! identity, so two tests never share interception rules by accident.

#![allow(missing_docs)]

use decoy_object::{ClassDef, ClassRef, Instance, ObjectError, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Install a test-writer subscriber once; honors `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn text(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), str::to_string)
}

fn full_name(this: &Instance) -> Result<Value, ObjectError> {
    Ok(Value::from(format!(
        "{} {}",
        text(&this.get("firstname")?),
        text(&this.get("lastname")?)
    )))
}

/// `Person { firstname, lastname, fullname (derived), get_full_name() }`
pub fn person() -> ClassRef {
    ClassDef::builder("Person")
        .getter("fullname", full_name)
        .method("get_full_name", |this, _| full_name(this))
        .build()
}

/// Service whose real methods must never run in a unit test
pub fn login_service() -> ClassRef {
    ClassDef::builder("LoginService")
        .field("service_name", "LoginService")
        .method("login", |_, _| Err(ObjectError::thrown("we want to avoid this")))
        .method("logout", |_, _| Err(ObjectError::thrown("Logout Called")))
        .build()
}

/// `should_login(model)`: username and password present and equal
pub fn login_validator() -> ClassRef {
    ClassDef::builder("LoginValidator")
        .method("should_login", |_, args| {
            let model = args
                .first()
                .cloned()
                .unwrap_or_default();
            let model = model.expect_object("should_login(model)")?;
            let username = model.get("username")?;
            let password = model.get("password")?;
            Ok(Value::Bool(
                username.is_truthy() && password.is_truthy() && username == password,
            ))
        })
        .build()
}

fn credentials(this: &Instance) -> Result<[Value; 2], ObjectError> {
    Ok([this.get("username")?, this.get("password")?])
}

/// Consumer of [`login_service`] and [`login_validator`]
pub fn login_model(service: &ClassRef, validator: &ClassRef) -> ClassRef {
    ClassDef::builder("LoginModel")
        .dependency("svc_login", service)
        .dependency("validator", validator)
        .method("is_valid", |this, _| {
            let [username, password] = credentials(this)?;
            Ok(Value::Bool(username.is_truthy() && password.is_truthy()))
        })
        .method("submit", |this, _| {
            if !this.call("is_valid", &[])?.is_truthy() {
                return Ok(Value::Bool(false));
            }
            let service = this.get("svc_login")?;
            service
                .expect_object("svc_login")?
                .call("login", &credentials(this)?)
        })
        .method("submit_with_external_validation", |this, _| {
            let validator = this.get("validator")?;
            let approved = validator
                .expect_object("validator")?
                .call("should_login", &[Value::Object(this.clone())])?;
            if !approved.is_truthy() {
                return Ok(Value::Bool(false));
            }
            let service = this.get("svc_login")?;
            service
                .expect_object("svc_login")?
                .call("login", &credentials(this)?)
        })
        .method("get_service_name", |this, _| {
            this.get("svc_login")?
                .expect_object("svc_login")?
                .get("service_name")
        })
        .build()
}

/// Class whose constructor and only method fault
pub fn class_i_dont_want_to_create() -> ClassRef {
    ClassDef::builder("ClassIDontWantToCreateInMyTest")
        .constructor(|_, _| Err(ObjectError::thrown("Dont call this")))
        .method("throw_error", |_, _| {
            Err(ObjectError::thrown("Dont call this either"))
        })
        .build()
}

/// The login sample graph, freshly built
#[derive(Debug, Clone)]
pub struct LoginSamples {
    pub service: ClassRef,
    pub validator: ClassRef,
    pub model: ClassRef,
}

impl LoginSamples {
    pub fn new() -> Self {
        let service = login_service();
        let validator = login_validator();
        let model = login_model(&service, &validator);
        Self {
            service,
            validator,
            model,
        }
    }
}

impl Default for LoginSamples {
    fn default() -> Self {
        Self::new()
    }
}

/// Constructor run counter shared with a class body
#[derive(Debug, Clone, Default)]
pub struct RunCounter(Arc<AtomicUsize>);

impl RunCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Class `name` whose constructor bumps `counter`, with optional dependencies
pub fn counted_class(name: &str, counter: &RunCounter, dependencies: &[(&str, &ClassRef)]) -> ClassRef {
    let mut builder = ClassDef::builder(name);
    for (field, class) in dependencies {
        builder = builder.dependency(*field, *class);
    }
    let counter = counter.clone();
    let label = name.to_string();
    builder
        .constructor(move |_, _| {
            counter.bump();
            Ok(())
        })
        .method("name", move |_, _| Ok(Value::from(label.as_str())))
        .method("dependency", |this, args| {
            let field = args.first().and_then(Value::as_str).unwrap_or_default();
            this.get(field)
        })
        .build()
}

/// `A -> B -> C`, each counting its constructor runs
#[derive(Debug, Clone)]
pub struct Chain {
    pub a: ClassRef,
    pub b: ClassRef,
    pub c: ClassRef,
    pub a_runs: RunCounter,
    pub b_runs: RunCounter,
    pub c_runs: RunCounter,
}

impl Chain {
    pub fn new() -> Self {
        let (a_runs, b_runs, c_runs) = (RunCounter::default(), RunCounter::default(), RunCounter::default());
        let c = counted_class("C", &c_runs, &[]);
        let b = counted_class("B", &b_runs, &[("c", &c)]);
        let a = counted_class("A", &a_runs, &[("b", &b)]);
        Self {
            a,
            b,
            c,
            a_runs,
            b_runs,
            c_runs,
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}
