//! Property-based tests for tag resolution.
//!
//! These use proptest to generate provider configurations and check the
//! resolution invariants that must hold for any of them.

use ferrous_ioc::{
    create_with, Arguments, ClassBuilder, ContainerOptions, DiError, DiResult, GlobalCache, Injectable, Provider,
    ProviderConfig, ProviderEntry, ProviderRegistry, Tag,
};
use proptest::prelude::*;
use std::sync::Arc;

struct Hinted {
    value: i64,
}

impl Injectable for Hinted {
    fn describe(class: &mut ClassBuilder<Self>) {
        class
            .param_tagged::<i64>("X")
            .hint(Provider::new("X").use_value(1i64));
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(Hinted { value: args.next_cloned()? })
    }
}

struct PropertyHinted {
    value: i64,
}

impl Injectable for PropertyHinted {
    fn describe(class: &mut ClassBuilder<Self>) {
        class
            .property("value", "X", |host: &mut PropertyHinted, v: Arc<i64>| host.value = *v)
            .hint(Provider::new("X").use_value(1i64));
    }

    fn construct(_: &mut Arguments) -> DiResult<Self> {
        Ok(PropertyHinted { value: 0 })
    }
}

struct Param {
    _v: Arc<i64>,
}

impl Injectable for Param {
    fn describe(class: &mut ClassBuilder<Self>) {
        class.param_tagged::<i64>("X");
    }

    fn construct(args: &mut Arguments) -> DiResult<Self> {
        Ok(Param { _v: args.next()? })
    }
}

struct Prop;

impl Injectable for Prop {
    fn describe(class: &mut ClassBuilder<Self>) {
        class.property("v", "X", |_: &mut Prop, _: Arc<i64>| {});
    }

    fn construct(_: &mut Arguments) -> DiResult<Self> {
        Ok(Prop)
    }
}

struct Global;

impl Injectable for Global {
    fn describe(class: &mut ClassBuilder<Self>) {
        class.global();
    }

    fn construct(_: &mut Arguments) -> DiResult<Self> {
        Ok(Global)
    }
}

fn error_kind<T>(result: DiResult<T>) -> Option<&'static str> {
    match result {
        Ok(_) => None,
        Err(DiError::UnknownProvider(_)) => Some("unknown"),
        Err(DiError::InvalidProvider(_)) => Some("invalid"),
        Err(_) => Some("other"),
    }
}

// Property: the caller's value always beats the hint, for parameters and properties alike
proptest! {
    #[test]
    fn caller_override_beats_hint(value in any::<i64>()) {
        let param = create_with::<Hinted>(Provider::new("X").use_value(value)).unwrap();
        let prop = create_with::<PropertyHinted>(Provider::new("X").use_value(value)).unwrap();
        prop_assert_eq!(param.value, value);
        prop_assert_eq!(prop.value, value);
    }
}

// Property: last write wins among any sequence of caller entries for one tag
proptest! {
    #[test]
    fn last_caller_entry_wins(values in prop::collection::vec(any::<i64>(), 1..10)) {
        let config: ProviderConfig = values
            .iter()
            .map(|v| ProviderEntry::from(Provider::new("X").use_value(*v)))
            .collect();
        let host = create_with::<Hinted>(config).unwrap();
        prop_assert_eq!(host.value, *values.last().unwrap());
    }
}

// Property: constructor and property injection fail identically
proptest! {
    #[test]
    fn param_and_property_errors_agree(mode in 0u8..3, value in any::<i64>()) {
        let providers = match mode {
            0 => ProviderConfig::new(),
            1 => ProviderConfig::new().with(Provider::new("X")),
            _ => ProviderConfig::new().with(Provider::new("X").use_value(value)),
        };
        let param = error_kind(create_with::<Param>(providers.clone()));
        let prop = error_kind(create_with::<Prop>(providers));
        prop_assert_eq!(param, prop);
        let expected = match mode {
            0 => Some("unknown"),
            1 => Some("invalid"),
            _ => None,
        };
        prop_assert_eq!(param, expected);
    }
}

// Property: registry size equals the number of distinct tags across caller and hints
proptest! {
    #[test]
    fn registry_holds_each_tag_once(
        caller in prop::collection::vec("[a-d]", 0..8),
        hints in prop::collection::vec("[a-f]", 0..8),
    ) {
        let caller_config: ProviderConfig = caller
            .iter()
            .map(|name| ProviderEntry::from(Provider::new(Tag::name(name.clone())).use_value(0u8)))
            .collect();
        let hint_config: ProviderConfig = hints
            .iter()
            .map(|name| ProviderEntry::from(Provider::new(Tag::name(name.clone()))))
            .collect();
        let registry = ProviderRegistry::build(&caller_config, Some(&hint_config));

        let mut distinct: Vec<&String> = caller.iter().chain(hints.iter()).collect();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(registry.len(), distinct.len());

        for name in &caller {
            prop_assert!(registry.get(&Tag::name(name.clone())).unwrap().has_strategy());
        }
    }
}

// Property: globals are shared within a namespace and distinct across namespaces
proptest! {
    #[test]
    fn globals_partition_by_namespace(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
        let globals = GlobalCache::new();
        let in_a = ContainerOptions::new().namespace(a.clone()).global_cache(globals.clone()).build();
        let also_a = ContainerOptions::new().namespace(a.clone()).global_cache(globals.clone()).build();
        let in_b = ContainerOptions::new().namespace(b.clone()).global_cache(globals.clone()).build();

        let first = in_a.create::<Global>().unwrap();
        prop_assert!(Arc::ptr_eq(&first, &also_a.create::<Global>().unwrap()));
        prop_assert_eq!(Arc::ptr_eq(&first, &in_b.create::<Global>().unwrap()), a == b);
    }
}
