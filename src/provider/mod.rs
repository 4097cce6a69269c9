//! Provider descriptors and provider configuration.
//!
//! A [`Provider`] binds a [`Tag`] to one resolution strategy: a precomputed
//! value, a factory, or a class to build. A [`ProviderConfig`] is the ordered
//! list callers hand to a build; bare classes in it are shorthand for a
//! provider that builds the class under its own tag.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::class::{Class, Injectable};
use crate::error::DiResult;
use crate::tag::Tag;
use crate::AnyArc;

pub mod context;
pub mod registry;

pub use context::FactoryContext;
pub use registry::ProviderRegistry;

/// Type-erased factory stored in a provider.
pub type FactoryFn = Arc<dyn for<'a> Fn(&FactoryContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Binding from a tag to a value, factory, or class.
///
/// A provider should set exactly one of `use_value`, `use_func` or
/// `use_class`. One that sets none is still accepted here and fails with
/// [`DiError::InvalidProvider`](crate::DiError::InvalidProvider) only when a
/// build actually needs its tag. If several are set, value wins over factory
/// and factory over class.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Arguments, DiResult, Injectable, Provider, Tag};
///
/// struct Mailer;
/// impl Injectable for Mailer {
///     fn construct(_: &mut Arguments) -> DiResult<Self> {
///         Ok(Mailer)
///     }
/// }
///
/// let port = Provider::new("PORT").use_value(8080u16);
/// let stamp = Provider::new("STAMP").use_func(|_| String::from("now"));
/// let mailer = Provider::new("MAILER").use_class::<Mailer>().singleton(true);
///
/// assert!(port.has_strategy());
/// assert_eq!(mailer.singleton_flag(), Some(true));
/// assert_eq!(stamp.tag(), &Tag::name("STAMP"));
/// assert!(!Provider::new("EMPTY").has_strategy());
/// ```
#[derive(Clone)]
pub struct Provider {
    tag: Tag,
    value: Option<AnyArc>,
    factory: Option<FactoryFn>,
    class: Option<Class>,
    singleton: Option<bool>,
    global: Option<bool>,
}

/// Resolution strategy a provider selects, in precedence order.
pub(crate) enum Strategy<'a> {
    Value(&'a AnyArc),
    Func(&'a FactoryFn),
    Class(Class),
}

impl Provider {
    /// Provider for `tag` with no strategy yet.
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            tag: tag.into(),
            value: None,
            factory: None,
            class: None,
            singleton: None,
            global: None,
        }
    }

    /// `{tag: class, use_class: class}`; what a bare class in a config means.
    pub fn class(class: Class) -> Self {
        Self::new(Tag::Class(class)).use_class_of(class)
    }

    /// Returns `value` on every resolution.
    pub fn use_value<V: Any + Send + Sync>(self, value: V) -> Self {
        self.use_arc(Arc::new(value))
    }

    /// Returns the given `Arc` on every resolution.
    pub fn use_arc<V: Any + Send + Sync>(self, value: Arc<V>) -> Self {
        self.use_any(value)
    }

    /// Returns an already type-erased value on every resolution.
    pub fn use_any(mut self, value: AnyArc) -> Self {
        self.value = Some(value);
        self
    }

    /// Invokes `factory` on every resolution; results are never memoised by
    /// the provider itself. The returned value is wrapped in a fresh `Arc`;
    /// use [`use_func_arc`](Self::use_func_arc) to hand out an existing one.
    pub fn use_func<V, F>(self, factory: F) -> Self
    where
        V: Any + Send + Sync,
        F: for<'a> Fn(&FactoryContext<'a>) -> V + Send + Sync + 'static,
    {
        self.try_use_func(move |ctx| Ok(factory(ctx)))
    }

    /// Like [`use_func`](Self::use_func) for factories that can fail.
    pub fn try_use_func<V, F>(self, factory: F) -> Self
    where
        V: Any + Send + Sync,
        F: for<'a> Fn(&FactoryContext<'a>) -> DiResult<V> + Send + Sync + 'static,
    {
        self.try_use_func_arc(move |ctx| factory(ctx).map(Arc::new))
    }

    /// Invokes `factory` on every resolution and hands out the returned `Arc`
    /// itself, so a factory can return shared instances such as
    /// `ctx.create::<T>()` or a captured singleton.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_ioc::{create_with, Arguments, ClassBuilder, DiResult, Injectable, Provider};
    /// use std::sync::Arc;
    ///
    /// struct Clock;
    ///
    /// struct Job {
    ///     clock: Arc<Clock>,
    /// }
    ///
    /// impl Injectable for Job {
    ///     fn describe(class: &mut ClassBuilder<Self>) {
    ///         class.param_tagged::<Clock>("CLOCK");
    ///     }
    ///     fn construct(args: &mut Arguments) -> DiResult<Self> {
    ///         Ok(Job { clock: args.next()? })
    ///     }
    /// }
    ///
    /// let clock = Arc::new(Clock);
    /// let handed = clock.clone();
    /// let job = create_with::<Job>(Provider::new("CLOCK").use_func_arc(move |_| handed.clone()))?;
    /// assert!(Arc::ptr_eq(&job.clock, &clock));
    /// # Ok::<(), ferrous_ioc::DiError>(())
    /// ```
    pub fn use_func_arc<V, F>(self, factory: F) -> Self
    where
        V: Any + Send + Sync,
        F: for<'a> Fn(&FactoryContext<'a>) -> Arc<V> + Send + Sync + 'static,
    {
        self.try_use_func_arc(move |ctx| Ok(factory(ctx)))
    }

    /// Like [`use_func_arc`](Self::use_func_arc) for factories that can fail.
    pub fn try_use_func_arc<V, F>(mut self, factory: F) -> Self
    where
        V: Any + Send + Sync,
        F: for<'a> Fn(&FactoryContext<'a>) -> DiResult<Arc<V>> + Send + Sync + 'static,
    {
        self.factory = Some(Arc::new(move |ctx: &FactoryContext<'_>| {
            factory(ctx).map(|value| value as AnyArc)
        }));
        self
    }

    /// Builds `C` recursively on every resolution.
    pub fn use_class<C: Injectable>(self) -> Self {
        self.use_class_of(Class::of::<C>())
    }

    /// Builds `class` recursively on every resolution.
    pub fn use_class_of(mut self, class: Class) -> Self {
        self.class = Some(class);
        self
    }

    /// Caches built instances in the local/shared cache. Only meaningful
    /// together with a class strategy.
    pub fn singleton(mut self, singleton: bool) -> Self {
        self.singleton = Some(singleton);
        self
    }

    /// Caches built instances in the global namespace cache. Only meaningful
    /// together with a class strategy.
    pub fn global(mut self, global: bool) -> Self {
        self.global = Some(global);
        self
    }

    /// Tag this provider answers.
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Explicit singleton flag, `None` when the class decides.
    pub fn singleton_flag(&self) -> Option<bool> {
        self.singleton
    }

    /// Explicit global flag, `None` when the class decides.
    pub fn global_flag(&self) -> Option<bool> {
        self.global
    }

    /// Whether any of the three strategies is set.
    pub fn has_strategy(&self) -> bool {
        self.strategy().is_some()
    }

    pub(crate) fn strategy(&self) -> Option<Strategy<'_>> {
        if let Some(value) = &self.value {
            Some(Strategy::Value(value))
        } else if let Some(factory) = &self.factory {
            Some(Strategy::Func(factory))
        } else {
            self.class.map(Strategy::Class)
        }
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("tag", &self.tag)
            .field("use_value", &self.value.is_some())
            .field("use_func", &self.factory.is_some())
            .field("use_class", &self.class)
            .field("singleton", &self.singleton)
            .field("global", &self.global)
            .finish()
    }
}

/// Entry of a provider configuration.
#[derive(Debug, Clone)]
pub enum ProviderEntry {
    /// Full provider descriptor
    Provider(Provider),
    /// Shorthand for `{tag: class, use_class: class}`
    Class(Class),
}

impl ProviderEntry {
    /// Tag the entry is registered under.
    pub fn tag(&self) -> Tag {
        match self {
            ProviderEntry::Provider(provider) => provider.tag().clone(),
            ProviderEntry::Class(class) => Tag::Class(*class),
        }
    }

    /// Normalises shorthand entries into full providers.
    pub fn to_provider(&self) -> Provider {
        match self {
            ProviderEntry::Provider(provider) => provider.clone(),
            ProviderEntry::Class(class) => Provider::class(*class),
        }
    }
}

impl From<Provider> for ProviderEntry {
    fn from(provider: Provider) -> Self {
        ProviderEntry::Provider(provider)
    }
}

impl From<Class> for ProviderEntry {
    fn from(class: Class) -> Self {
        ProviderEntry::Class(class)
    }
}

/// Ordered list of providers and bare classes.
///
/// Order never changes which provider a tag resolves to beyond
/// last-write-wins among duplicate caller entries.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{providers, Arguments, Class, DiResult, Injectable, Provider, ProviderConfig};
///
/// struct DepA;
/// impl Injectable for DepA {
///     fn construct(_: &mut Arguments) -> DiResult<Self> {
///         Ok(DepA)
///     }
/// }
///
/// let config: ProviderConfig = providers![
///     Class::of::<DepA>(),
///     Provider::new("TEST").use_value(15i32),
/// ];
/// assert_eq!(config.len(), 2);
///
/// let same = ProviderConfig::new()
///     .with(Class::of::<DepA>())
///     .with(Provider::new("TEST").use_value(15i32));
/// assert_eq!(same.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    entries: Vec<ProviderEntry>,
}

impl ProviderConfig {
    /// Empty configuration.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: impl Into<ProviderEntry>) -> &mut Self {
        self.entries.push(entry.into());
        self
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, entry: impl Into<ProviderEntry>) -> Self {
        self.push(entry);
        self
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ProviderEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<ProviderEntry>> for ProviderConfig {
    fn from(entries: Vec<ProviderEntry>) -> Self {
        Self { entries }
    }
}

impl From<Provider> for ProviderConfig {
    fn from(provider: Provider) -> Self {
        Self::new().with(provider)
    }
}

impl From<Class> for ProviderConfig {
    fn from(class: Class) -> Self {
        Self::new().with(class)
    }
}

impl FromIterator<ProviderEntry> for ProviderConfig {
    fn from_iter<I: IntoIterator<Item = ProviderEntry>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

impl Extend<ProviderEntry> for ProviderConfig {
    fn extend<I: IntoIterator<Item = ProviderEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl<'a> IntoIterator for &'a ProviderConfig {
    type Item = &'a ProviderEntry;
    type IntoIter = std::slice::Iter<'a, ProviderEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builds a [`ProviderConfig`] from providers and classes.
///
/// ```rust
/// use ferrous_ioc::{providers, Provider};
///
/// let config = providers![Provider::new("A").use_value(1u8), Provider::new("B")];
/// assert_eq!(config.len(), 2);
/// assert!(providers![].is_empty());
/// ```
#[macro_export]
macro_rules! providers {
    () => {
        $crate::ProviderConfig::new()
    };
    ($($entry:expr),+ $(,)?) => {
        $crate::ProviderConfig::from(::std::vec![$($crate::ProviderEntry::from($entry)),+])
    };
}
