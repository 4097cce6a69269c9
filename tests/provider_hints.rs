use ferrous_ioc::{
    create, create_configured, create_with, providers, Arguments, Class, ClassBuilder, DiResult, Injectable, Provider,
};
use std::sync::Arc;

const TEST_STRING: &str = "TEST_STRING";

struct DepA;

impl Injectable for DepA {
    fn construct(_: &mut Arguments) -> DiResult<Self> {
        Ok(DepA)
    }
}

struct HostA {
    dep_a: Arc<DepA>,
    dep_b: Arc<String>,
}

impl Injectable for HostA {
    fn describe(class: &mut ClassBuilder<Self>) {
        class
            .param::<DepA>()
            .param_tagged::<String>("TEST")
            .hint(Class::of::<DepA>())
            .hint(Provider::new("TEST").use_value(String::from(TEST_STRING)));
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(HostA {
            dep_a: args.next()?,
            dep_b: args.next()?,
        })
    }
}

/// Dependency that leans on its own hint; the host gives it nothing.
struct Inner {
    label: Arc<String>,
}

impl Injectable for Inner {
    fn describe(class: &mut ClassBuilder<Self>) {
        class
            .param_tagged::<String>("LABEL")
            .hint(Provider::new("LABEL").use_value(String::from("inner default")));
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(Inner { label: args.next()? })
    }
}

struct Outer {
    inner: Arc<Inner>,
}

impl Injectable for Outer {
    fn describe(class: &mut ClassBuilder<Self>) {
        class
            .param::<Inner>()
            .hint(Provider::new("LABEL").use_value(String::from("outer hint")));
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(Outer { inner: args.next()? })
    }
}

#[test]
fn test_provider_hints() {
    let host = create::<HostA>().unwrap();
    let _dep: &Arc<DepA> = &host.dep_a;
    assert_eq!(host.dep_b.as_str(), TEST_STRING);
}

#[test]
fn test_overriding_hints() {
    let host = create_with::<HostA>(Provider::new("TEST").use_value(String::from("abc123"))).unwrap();
    assert_eq!(host.dep_b.as_str(), "abc123");
}

#[test]
fn test_class_hint_works_without_autowire() {
    let host = create_configured::<HostA>(false, providers![]).unwrap();
    assert_eq!(host.dep_b.as_str(), TEST_STRING);
}

#[test]
fn test_hints_do_not_leak_into_dependencies() {
    // Outer's hint for LABEL is not forwarded; Inner falls back to its own
    let outer = create::<Outer>().unwrap();
    assert_eq!(outer.inner.label.as_str(), "inner default");
}

#[test]
fn test_caller_providers_reach_every_depth() {
    let outer = create_with::<Outer>(Provider::new("LABEL").use_value(String::from("caller"))).unwrap();
    assert_eq!(outer.inner.label.as_str(), "caller");
}

#[test]
fn test_hint_metadata_is_queryable() {
    let meta = Class::of::<HostA>().metadata();
    let hints = meta.class_hints().unwrap();
    assert_eq!(hints.len(), 2);
    assert!(Class::of::<DepA>().metadata().class_hints().is_none());
}
