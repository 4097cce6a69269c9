//! Context passed to provider factories.

use std::sync::Arc;

use crate::class::Injectable;
use crate::container::Container;
use crate::error::DiResult;
use crate::tag::Tag;

/// What a `use_func` factory sees when it is invoked.
///
/// `requester` is the class whose constructor asked for the dependency, or
/// the property's own tag for property injection. `container` is a child
/// container sharing the build's cache, namespace, autowire flag and
/// providers, so factories can build further instances that observe the same
/// singletons.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{create_with, Arguments, ClassBuilder, DiResult, Injectable, Provider, Tag};
/// use std::sync::Arc;
///
/// struct Greeting(String);
///
/// struct Host {
///     greeting: Arc<Greeting>,
/// }
///
/// impl Injectable for Host {
///     fn describe(class: &mut ClassBuilder<Self>) {
///         class.param_tagged::<Greeting>("GREETING");
///     }
///     fn construct(args: &mut Arguments) -> DiResult<Self> {
///         Ok(Host { greeting: args.next()? })
///     }
/// }
///
/// let host = create_with::<Host>(
///     Provider::new("GREETING").use_func(|ctx| Greeting(format!("built for {}", ctx.requester()))),
/// )
/// .unwrap();
/// assert!(host.greeting.0.ends_with("Host"));
/// ```
pub struct FactoryContext<'a> {
    requester: &'a Tag,
    container: Container,
}

impl<'a> FactoryContext<'a> {
    pub(crate) fn new(requester: &'a Tag, container: Container) -> Self {
        Self { requester, container }
    }

    /// Class (for parameters) or tag (for properties) being served.
    pub fn requester(&self) -> &Tag {
        self.requester
    }

    /// Child container bound to the current build's configuration and cache.
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Shorthand for `self.container().create::<T>()`.
    pub fn create<T: Injectable>(&self) -> DiResult<Arc<T>> {
        self.container.create::<T>()
    }
}
