use ferrous_ioc::{
    providers, Arguments, Class, ClassBuilder, Container, ContainerOptions, DiError, DiResult, GlobalCache,
    InstanceCache, Injectable, Namespace, Provider, Tag,
};
use std::sync::Arc;

struct DepA;

impl Injectable for DepA {
    fn construct(_: &mut Arguments) -> DiResult<Self> {
        Ok(DepA)
    }
}

struct HostA {
    dep: Arc<DepA>,
}

impl Injectable for HostA {
    fn describe(class: &mut ClassBuilder<Self>) {
        class.param::<DepA>();
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(HostA { dep: args.next()? })
    }
}

fn singleton_dep() -> Provider {
    Provider::new(Tag::of::<DepA>()).use_class::<DepA>().singleton(true)
}

#[test]
fn test_ioc_container() {
    let ioc = Container::new(ContainerOptions::new());
    let host = ioc.create::<HostA>().unwrap();
    let _dep: &Arc<DepA> = &host.dep;
}

#[test]
fn test_manual_ioc_container() {
    let ioc = ContainerOptions::new()
        .autowire(false)
        .providers(providers![Class::of::<HostA>(), Class::of::<DepA>()])
        .build();
    let host = ioc.create::<HostA>().unwrap();
    let _dep: &Arc<DepA> = &host.dep;

    let bare = ContainerOptions::new().autowire(false).build();
    assert!(matches!(bare.create::<HostA>(), Err(DiError::UnknownProvider(_))));
}

#[test]
fn test_ioc_namespaces() {
    let c1 = Container::new(ContainerOptions::new());
    let c2 = Container::new(ContainerOptions::new());
    let c3 = Container::new(ContainerOptions::new().namespace("TEST"));
    assert_ne!(c1.namespace(), c2.namespace());
    assert_eq!(c3.namespace(), &Namespace::from("TEST"));
}

#[test]
fn test_ioc_shared_cache() {
    let ioc = ContainerOptions::new().shared_cache(true).provider(singleton_dep()).build();
    let test1 = ioc.create::<HostA>().unwrap();
    let test2 = ioc.create::<HostA>().unwrap();
    assert!(Arc::ptr_eq(&test1.dep, &test2.dep));
}

#[test]
fn test_manual_ioc_shared_cache() {
    let shared = InstanceCache::new();
    let ioc = ContainerOptions::new()
        .with_shared_cache(shared.clone())
        .provider(singleton_dep())
        .build();
    let test1 = ioc.create::<HostA>().unwrap();
    let test2 = ioc.create::<HostA>().unwrap();
    assert!(Arc::ptr_eq(&test1.dep, &test2.dep));

    // The caller's handle observes the container's writes
    let cached = shared.get_typed::<DepA>().unwrap();
    assert!(Arc::ptr_eq(&cached, &test1.dep));
}

#[test]
fn test_unshared_container_starts_fresh_each_call() {
    let ioc = ContainerOptions::new().provider(singleton_dep()).build();
    let test1 = ioc.create::<HostA>().unwrap();
    let test2 = ioc.create::<HostA>().unwrap();
    assert!(!Arc::ptr_eq(&test1.dep, &test2.dep));
    assert!(ioc.shared_cache().is_none());
}

#[test]
fn test_containers_can_share_one_cache() {
    let shared = InstanceCache::new();
    let a = ContainerOptions::new().with_shared_cache(shared.clone()).provider(singleton_dep()).build();
    let b = ContainerOptions::new().with_shared_cache(shared).provider(singleton_dep()).build();
    assert!(Arc::ptr_eq(&a.create::<HostA>().unwrap().dep, &b.create::<HostA>().unwrap().dep));
}

#[test]
fn test_create_class_is_type_erased() {
    let ioc = Container::default();
    let any = ioc.create_class(&Class::of::<HostA>()).unwrap();
    assert!(any.downcast::<HostA>().is_ok());
}

#[test]
fn test_explicit_global_cache_is_isolated_from_process_cache() {
    let globals = GlobalCache::new();
    let ioc = ContainerOptions::new()
        .namespace("isolated")
        .global_cache(globals.clone())
        .provider(Provider::new(Tag::of::<DepA>()).use_class::<DepA>().global(true))
        .build();

    let first = ioc.create::<HostA>().unwrap();
    let second = ioc.create::<HostA>().unwrap();
    assert!(Arc::ptr_eq(&first.dep, &second.dep));
    assert_eq!(globals.namespace_len(&Namespace::from("isolated")), 1);
    assert!(!GlobalCache::process().contains(&Namespace::from("isolated"), Class::of::<DepA>().id()));
}

#[test]
fn test_accessors_reflect_options() {
    let ioc = ContainerOptions::new()
        .autowire(false)
        .namespace("acc")
        .provider(Class::of::<DepA>())
        .shared_cache(true)
        .build();
    assert!(!ioc.autowire());
    assert_eq!(ioc.namespace().to_string(), "acc");
    assert_eq!(ioc.providers().len(), 1);
    assert!(ioc.shared_cache().is_some());
}
