//! Tag resolution and recursive instance building.

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use crate::cache::{GlobalCache, InstanceCache};
use crate::class::Class;
use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::internal::{ArgVec, StackGuard};
use crate::namespace::Namespace;
use crate::observer::{CacheTier, Observers};
use crate::provider::{FactoryContext, Provider, ProviderConfig, ProviderRegistry, Strategy};
use crate::tag::Tag;
use crate::{AnyArc, Arguments};

/// Everything one top-level build carries down the recursion.
///
/// Nested builds reuse the same bundle; only the singleton/global flags vary
/// per frame.
#[derive(Clone)]
pub(crate) struct Resolver {
    pub(crate) autowire: bool,
    pub(crate) providers: Arc<ProviderConfig>,
    pub(crate) namespace: Namespace,
    pub(crate) cache: InstanceCache,
    pub(crate) globals: GlobalCache,
    pub(crate) observers: Observers,
}

impl Resolver {
    /// Builds `class`, or returns a cached instance.
    ///
    /// `singleton` and `global` override the class-declared caching flags
    /// when set.
    pub(crate) fn build_class(
        &self,
        class: &Class,
        singleton: Option<bool>,
        global: Option<bool>,
    ) -> DiResult<AnyArc> {
        // Global cache first: a namespaced singleton shadows a local one.
        if let Some(hit) = self.globals.get(&self.namespace, class.id()) {
            self.observers.cache_hit(class, CacheTier::Global);
            return Ok(hit);
        }
        if let Some(hit) = self.cache.get(class.id()) {
            self.observers.cache_hit(class, CacheTier::Local);
            return Ok(hit);
        }

        let _guard = match StackGuard::enter(class.id(), class.name()) {
            Ok(guard) => guard,
            Err(err) => {
                self.observers.failed(class, &err);
                return Err(err);
            }
        };

        if !self.observers.has_observers() {
            return self.construct(class, singleton, global);
        }

        self.observers.building(class, &self.namespace);
        let started = Instant::now();

        match self.construct(class, singleton, global) {
            Ok(instance) => {
                self.observers.built(class, started.elapsed());
                Ok(instance)
            }
            Err(err) => {
                self.observers.failed(class, &err);
                Err(err)
            }
        }
    }

    fn construct(&self, class: &Class, singleton: Option<bool>, global: Option<bool>) -> DiResult<AnyArc> {
        let meta = class.metadata();
        let registry = ProviderRegistry::build(&self.providers, meta.class_hints());
        let requester = Tag::Class(*class);

        let mut values = ArgVec::with_capacity(meta.param_tags().len());
        for (index, declared) in meta.param_tags().iter().enumerate() {
            let tag = meta.param_override(index).unwrap_or(declared);
            values.push(self.resolve_dependency(tag, &registry, &requester)?);
        }

        let mut instance = meta.instantiate(&mut Arguments::new(class.name(), values))?;

        for property in meta.properties() {
            let value = self.resolve_dependency(&property.tag, &registry, &property.tag)?;
            property.assign(&mut *instance, value)?;
        }

        let instance: AnyArc = Arc::from(instance);

        if singleton.unwrap_or(meta.is_singleton()) {
            self.cache.insert(class.id(), instance.clone());
        }
        if global.unwrap_or(meta.is_global()) {
            self.globals.insert(&self.namespace, class.id(), instance.clone());
        }

        Ok(instance)
    }

    /// Resolves one constructor parameter or property.
    ///
    /// `requester` is what a factory sees: the class under construction for
    /// parameters, the property's own tag for properties.
    fn resolve_dependency(&self, tag: &Tag, registry: &ProviderRegistry, requester: &Tag) -> DiResult<AnyArc> {
        let autowired;
        let provider = match registry.get(tag) {
            Some(provider) => provider,
            None => match tag.as_class() {
                Some(class) if self.autowire => {
                    autowired = Provider::class(*class);
                    &autowired
                }
                _ => return Err(DiError::UnknownProvider(tag.clone())),
            },
        };

        match provider.strategy() {
            Some(Strategy::Value(value)) => Ok(value.clone()),
            Some(Strategy::Func(factory)) => {
                let ctx = FactoryContext::new(requester, Container::child(self));
                factory(&ctx)
            }
            Some(Strategy::Class(class)) => {
                self.build_class(&class, provider.singleton_flag(), provider.global_flag())
            }
            None => Err(DiError::InvalidProvider(tag.clone())),
        }
    }
}

/// Recovers the concrete type of a built instance.
pub(crate) fn downcast_instance<T: Any + Send + Sync>(instance: AnyArc) -> DiResult<Arc<T>> {
    instance
        .downcast::<T>()
        .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{ClassBuilder, Injectable};

    struct Leaf;
    impl Injectable for Leaf {
        fn describe(class: &mut ClassBuilder<Self>) {
            class.singleton();
        }
        fn construct(_: &mut Arguments) -> DiResult<Self> {
            Ok(Leaf)
        }
    }

    struct Root {
        leaf: Arc<Leaf>,
    }
    impl Injectable for Root {
        fn describe(class: &mut ClassBuilder<Self>) {
            class.param::<Leaf>();
        }
        fn construct(args: &mut Arguments) -> DiResult<Self> {
            Ok(Root { leaf: args.next()? })
        }
    }

    fn resolver(autowire: bool, providers: ProviderConfig) -> Resolver {
        Resolver {
            autowire,
            providers: Arc::new(providers),
            namespace: Namespace::unique(),
            cache: InstanceCache::new(),
            globals: GlobalCache::new(),
            observers: Observers::new(),
        }
    }

    #[test]
    fn autowired_singleton_lands_in_local_cache() {
        let resolver = resolver(true, ProviderConfig::new());
        let root = resolver.build_class(&Class::of::<Root>(), None, None).unwrap();
        let root = root.downcast::<Root>().ok().unwrap();
        let cached = resolver.cache.get_typed::<Leaf>().unwrap();
        assert!(Arc::ptr_eq(&root.leaf, &cached));
        assert!(!resolver.cache.contains(Class::of::<Root>().id()));
    }

    #[test]
    fn explicit_flag_overrides_class_flag() {
        let resolver = resolver(true, ProviderConfig::new());
        resolver.build_class(&Class::of::<Leaf>(), Some(false), Some(true)).unwrap();
        assert!(resolver.cache.is_empty());
        assert!(resolver.globals.contains(&resolver.namespace, Class::of::<Leaf>().id()));
    }

    #[test]
    fn without_autowire_class_tags_are_unknown() {
        let resolver = resolver(false, ProviderConfig::new());
        match resolver.build_class(&Class::of::<Root>(), None, None) {
            Err(DiError::UnknownProvider(tag)) => assert_eq!(tag, Tag::of::<Leaf>()),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn global_hit_shadows_local_hit() {
        let resolver = resolver(true, ProviderConfig::new());
        let local: AnyArc = Arc::new(Leaf);
        let global: AnyArc = Arc::new(Leaf);
        resolver.cache.insert(Class::of::<Leaf>().id(), local);
        resolver.globals.insert(&resolver.namespace, Class::of::<Leaf>().id(), global.clone());
        let hit = resolver.build_class(&Class::of::<Leaf>(), None, None).unwrap();
        assert!(Arc::ptr_eq(&hit, &global));
    }
}
