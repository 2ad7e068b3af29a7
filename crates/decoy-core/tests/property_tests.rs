use decoy_core::prelude::*;
use decoy_core::Selector;
use proptest::prelude::*;
use std::collections::HashMap;

fn value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-z ]{0,8}".prop_map(Value::from),
    ]
}

fn ident() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,10}"
}

proptest! {
    #[test]
    fn prop_auto_prop_reads_back_last_write(
        writes in proptest::collection::vec(("[a-e]", value()), 0..24),
        probe in "[a-h]",
    ) {
        let class = ClassDef::builder("Bag").build();
        let mkr = AutoMocker::new();
        mkr.auto_prop(&class);
        let obj = mkr.resolve_instance(&class).unwrap();

        let mut expected = HashMap::new();
        for (name, v) in writes {
            obj.set(&name, v.clone()).unwrap();
            expected.insert(name, v);
        }

        for (name, v) in &expected {
            prop_assert_eq!(&obj.get(name).unwrap(), v);
        }
        let read = obj.get(&probe).unwrap();
        match expected.get(&probe) {
            Some(v) => prop_assert_eq!(&read, v),
            None => prop_assert!(read.is_undefined()),
        }
    }

    #[test]
    fn prop_stub_answers_null_for_any_member(member in ident(), arg in value()) {
        let class = ClassDef::builder("Anything").build();
        let mkr = AutoMocker::new();
        mkr.stub(&class, false);
        let obj = mkr.resolve_instance(&class).unwrap();

        prop_assert!(obj.call(&member, &[arg.clone()]).unwrap().is_null());
        obj.set(&member, arg).unwrap();
        prop_assert!(obj.get(&member).unwrap().is_null());
    }

    #[test]
    fn prop_spy_identity_is_stable(member in ident(), repeats in 2..6usize) {
        let class = ClassDef::builder("Service").build();
        let mkr = AutoMocker::new();
        let first = mkr.mock(&class, &member);
        for _ in 1..repeats {
            prop_assert!(first.ptr_eq(&mkr.mock(&class, &member)));
        }
        prop_assert_eq!(mkr.spies().len(), 1);
    }

    #[test]
    fn prop_selector_forms_agree(param in ident(), member in ident()) {
        let forms = [
            format!("|{param}| {param}.{member}"),
            format!("| {param} : Ty | {param} . {member}"),
            format!("{param} => {param}.{member}"),
            format!("({param})=>{param}.{member}"),
        ];
        for form in &forms {
            let parsed = Selector::parse(form);
            prop_assert!(parsed.is_ok(), "{} failed: {:?}", form, parsed);
            let selector = parsed.unwrap();
            prop_assert_eq!(selector.member(), member.as_str());
        }
    }

    #[test]
    fn prop_selector_rejects_trailing_expressions(
        param in ident(),
        member in ident(),
        tail in prop_oneof![Just(" + 1"), Just("()"), Just(".x"), Just(" * y")],
    ) {
        let text = format!("|{param}| {param}.{member}{tail}");
        prop_assert!(Selector::parse(&text).is_err());
    }
}
