use ferrous_ioc::{
    create, create_with, Arguments, ClassBuilder, DiError, DiResult, Injectable, Provider,
};
use std::sync::Arc;

struct A {
    _b: Arc<B>,
}

struct B {
    _a: Arc<A>,
}

impl Injectable for A {
    fn describe(class: &mut ClassBuilder<Self>) {
        class.param::<B>();
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(A { _b: args.next()? })
    }
}

impl Injectable for B {
    fn describe(class: &mut ClassBuilder<Self>) {
        class.param::<A>();
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(B { _a: args.next()? })
    }
}

struct SelfRef;

impl Injectable for SelfRef {
    fn describe(class: &mut ClassBuilder<Self>) {
        class.property("me", "ME", |_: &mut SelfRef, _: Arc<SelfRef>| {});
    }

    fn construct(_: &mut Arguments) -> DiResult<Self> {
        Ok(SelfRef)
    }
}

struct ViaFactory {
    _inner: Arc<FactoryBuilt>,
}

struct FactoryBuilt;

impl Injectable for ViaFactory {
    fn describe(class: &mut ClassBuilder<Self>) {
        class.param_tagged::<FactoryBuilt>("INNER");
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(ViaFactory { _inner: args.next()? })
    }
}

fn short(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

#[test]
fn test_two_class_cycle_reports_full_path() {
    match create::<A>() {
        Err(DiError::Circular(path)) => {
            let names: Vec<&str> = path.iter().map(|n| short(n)).collect();
            assert_eq!(names, vec!["A", "B", "A"]);
        }
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("expected a cycle"),
    }
}

#[test]
fn test_cycle_through_property_is_detected() {
    let result = create_with::<SelfRef>(Provider::new("ME").use_class::<SelfRef>());
    match result {
        Err(DiError::Circular(path)) => assert_eq!(path.len(), 2),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("expected a cycle"),
    }
}

#[test]
fn test_cycle_through_factory_container_is_detected() {
    let result = create_with::<ViaFactory>(Provider::new("INNER").try_use_func(|ctx| {
        ctx.create::<ViaFactory>()?;
        Ok(FactoryBuilt)
    }));
    assert!(matches!(result, Err(DiError::Circular(_))));
}

#[test]
fn test_stack_is_clean_after_a_cycle() {
    assert!(create::<A>().is_err());
    // An unrelated build on the same thread still works
    assert!(create::<FactoryFree>().is_ok());
}

struct FactoryFree;

impl Injectable for FactoryFree {
    fn construct(_: &mut Arguments) -> DiResult<Self> {
        Ok(FactoryFree)
    }
}
