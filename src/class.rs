//! Construction metadata for constructible types.
//!
//! A type becomes constructible by implementing [`Injectable`]: `describe`
//! declares its constructor parameters, injectable properties, provider
//! hints and caching flags, and `construct` builds it from the resolved
//! arguments. The resulting [`ClassMetadata`] is computed once per type and
//! kept in a process-wide table.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::{DiError, DiResult};
use crate::internal::{ArgVec, FastMap, Lock};
use crate::provider::{ProviderConfig, ProviderEntry};
use crate::tag::Tag;
use crate::AnyArc;

pub(crate) type AnyBox = Box<dyn Any + Send + Sync>;
type ConstructFn = fn(&mut Arguments) -> DiResult<AnyBox>;
type AssignFn = Box<dyn Fn(&mut (dyn Any + Send + Sync), AnyArc) -> DiResult<()> + Send + Sync>;

// Metadata is computed outside the lock; describe() may itself touch other classes.
static METADATA: Lazy<Lock<FastMap<TypeId, Arc<ClassMetadata>>>> =
    Lazy::new(|| Lock::new(FastMap::default()));

/// A type the resolver knows how to construct.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{create, Arguments, ClassBuilder, DiResult, Injectable};
/// use std::sync::Arc;
///
/// struct Database;
/// impl Injectable for Database {
///     fn construct(_: &mut Arguments) -> DiResult<Self> {
///         Ok(Database)
///     }
/// }
///
/// struct UserService {
///     db: Arc<Database>,
/// }
///
/// impl Injectable for UserService {
///     fn describe(class: &mut ClassBuilder<Self>) {
///         class.param::<Database>();
///     }
///
///     fn construct(args: &mut Arguments) -> DiResult<Self> {
///         Ok(UserService { db: args.next()? })
///     }
/// }
///
/// let service = create::<UserService>().unwrap();
/// let _db: &Arc<Database> = &service.db;
/// ```
pub trait Injectable: Any + Send + Sync + Sized {
    /// Declares parameters, properties, hints and flags.
    ///
    /// The default declares nothing: no parameters, no properties.
    fn describe(class: &mut ClassBuilder<Self>) {
        let _ = class;
    }

    /// Builds the value from arguments resolved in declared parameter order.
    fn construct(args: &mut Arguments) -> DiResult<Self>;
}

fn construct_erased<T: Injectable>(args: &mut Arguments) -> DiResult<AnyBox> {
    T::construct(args).map(|value| Box::new(value) as AnyBox)
}

fn describe_erased<T: Injectable>() -> ClassMetadata {
    let mut builder = ClassBuilder::<T>::new();
    T::describe(&mut builder);
    builder.meta
}

/// Handle to a constructible type.
///
/// Cheap to copy. Two handles are equal when they refer to the same type.
#[derive(Clone, Copy)]
pub struct Class {
    id: TypeId,
    name: &'static str,
    describe: fn() -> ClassMetadata,
}

impl Class {
    /// Handle for `T`.
    pub fn of<T: Injectable>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            describe: describe_erased::<T>,
        }
    }

    /// TypeId of the class; also its cache key.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Type name for diagnostics.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Construction metadata, computed on first use and then shared.
    pub fn metadata(&self) -> Arc<ClassMetadata> {
        if let Some(meta) = METADATA.read(|table| table.get(&self.id).cloned()) {
            return meta;
        }
        let meta = Arc::new((self.describe)());
        METADATA.write(|table| table.entry(self.id).or_insert(meta).clone())
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Class").field(&self.name).finish()
    }
}

/// Injectable property declared on a class.
pub(crate) struct PropertyBinding {
    pub(crate) name: &'static str,
    pub(crate) tag: Tag,
    assign: AssignFn,
}

impl PropertyBinding {
    pub(crate) fn assign(&self, target: &mut (dyn Any + Send + Sync), value: AnyArc) -> DiResult<()> {
        (self.assign)(target, value)
    }
}

/// Construction metadata of one class.
///
/// This is the read-only view the resolver queries while building.
pub struct ClassMetadata {
    class: &'static str,
    params: Vec<Tag>,
    overrides: FastMap<usize, Tag>,
    properties: Vec<PropertyBinding>,
    hints: Option<ProviderConfig>,
    singleton: bool,
    global: bool,
    construct: ConstructFn,
}

impl ClassMetadata {
    /// Declared parameter tags in constructor order, before overrides.
    pub fn param_tags(&self) -> &[Tag] {
        &self.params
    }

    /// Explicit tag override for the parameter at `index`.
    pub fn param_override(&self, index: usize) -> Option<&Tag> {
        self.overrides.get(&index)
    }

    /// Tag actually used for the parameter at `index`.
    pub fn effective_param_tag(&self, index: usize) -> Option<&Tag> {
        self.param_override(index).or_else(|| self.params.get(index))
    }

    /// Property names with their tags, in declaration order.
    pub fn property_tags(&self) -> impl Iterator<Item = (&'static str, &Tag)> + '_ {
        self.properties.iter().map(|p| (p.name, &p.tag))
    }

    /// Provider hints declared by the class.
    pub fn class_hints(&self) -> Option<&ProviderConfig> {
        self.hints.as_ref()
    }

    /// Whether the class caches itself in the local/shared cache.
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    /// Whether the class caches itself in the global namespace cache.
    pub fn is_global(&self) -> bool {
        self.global
    }

    pub(crate) fn properties(&self) -> &[PropertyBinding] {
        &self.properties
    }

    pub(crate) fn instantiate(&self, args: &mut Arguments) -> DiResult<AnyBox> {
        (self.construct)(args)
    }
}

impl fmt::Debug for ClassMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassMetadata")
            .field("class", &self.class)
            .field("params", &self.params)
            .field("overrides", &self.overrides)
            .field("properties", &self.properties.iter().map(|p| p.name).collect::<Vec<_>>())
            .field("hints", &self.hints.as_ref().map(|h| h.len()))
            .field("singleton", &self.singleton)
            .field("global", &self.global)
            .finish()
    }
}

/// Declaration surface handed to [`Injectable::describe`].
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Arguments, ClassBuilder, DiResult, Injectable, Provider, Tag};
/// use std::sync::Arc;
///
/// struct Cache;
/// impl Injectable for Cache {
///     fn construct(_: &mut Arguments) -> DiResult<Self> {
///         Ok(Cache)
///     }
/// }
///
/// struct Api {
///     cache: Arc<Cache>,
///     base_url: Arc<String>,
///     retries: u32,
/// }
///
/// impl Injectable for Api {
///     fn describe(class: &mut ClassBuilder<Self>) {
///         class
///             .param::<Cache>()
///             .param_tagged::<String>("BASE_URL")
///             .property("retries", "RETRIES", |api: &mut Api, n: Arc<u32>| api.retries = *n)
///             .hint(Provider::new("BASE_URL").use_value(String::from("http://localhost")))
///             .hint(Provider::new("RETRIES").use_value(3u32))
///             .singleton();
///     }
///
///     fn construct(args: &mut Arguments) -> DiResult<Self> {
///         Ok(Api { cache: args.next()?, base_url: args.next()?, retries: 0 })
///     }
/// }
///
/// let meta = ferrous_ioc::Class::of::<Api>().metadata();
/// assert_eq!(meta.param_tags().len(), 2);
/// assert_eq!(meta.param_override(1), Some(&Tag::name("BASE_URL")));
/// assert!(meta.is_singleton());
/// ```
pub struct ClassBuilder<T> {
    meta: ClassMetadata,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> ClassBuilder<T> {
    fn new() -> Self {
        Self {
            meta: ClassMetadata {
                class: std::any::type_name::<T>(),
                params: Vec::new(),
                overrides: FastMap::default(),
                properties: Vec::new(),
                hints: None,
                singleton: false,
                global: false,
                construct: construct_erased::<T>,
            },
            _marker: PhantomData,
        }
    }

    /// Appends a parameter whose declared type is the constructible `P`.
    pub fn param<P: Injectable>(&mut self) -> &mut Self {
        self.meta.params.push(Tag::of::<P>());
        self
    }

    /// Appends a parameter whose declared type is a plain Rust type.
    ///
    /// Such a parameter can only be satisfied by a provider registered under
    /// `Tag::of_type::<P>()` or by an override.
    pub fn param_of<P: Any>(&mut self) -> &mut Self {
        self.meta.params.push(Tag::of_type::<P>());
        self
    }

    /// Appends a parameter of type `P` resolved through an explicit tag.
    pub fn param_tagged<P: Any>(&mut self, tag: impl Into<Tag>) -> &mut Self {
        let index = self.meta.params.len();
        self.meta.params.push(Tag::of_type::<P>());
        self.meta.overrides.insert(index, tag.into());
        self
    }

    /// Overrides the tag of an already declared parameter position.
    pub fn inject(&mut self, index: usize, tag: impl Into<Tag>) -> &mut Self {
        self.meta.overrides.insert(index, tag.into());
        self
    }

    /// Declares an injectable property, assigned after construction.
    pub fn property<V, F>(&mut self, name: &'static str, tag: impl Into<Tag>, setter: F) -> &mut Self
    where
        V: Any + Send + Sync,
        F: Fn(&mut T, Arc<V>) + Send + Sync + 'static,
    {
        let assign = move |target: &mut (dyn Any + Send + Sync), value: AnyArc| -> DiResult<()> {
            let target = target
                .downcast_mut::<T>()
                .ok_or(DiError::TypeMismatch(std::any::type_name::<T>()))?;
            let value = value
                .downcast::<V>()
                .map_err(|_| DiError::TypeMismatch(std::any::type_name::<V>()))?;
            setter(target, value);
            Ok(())
        };
        self.meta.properties.push(PropertyBinding {
            name,
            tag: tag.into(),
            assign: Box::new(assign),
        });
        self
    }

    /// Adds a default provider; callers may override it per tag.
    pub fn hint(&mut self, entry: impl Into<ProviderEntry>) -> &mut Self {
        self.meta.hints.get_or_insert_with(ProviderConfig::new).push(entry);
        self
    }

    /// Adds several default providers.
    pub fn hints(&mut self, entries: impl IntoIterator<Item = ProviderEntry>) -> &mut Self {
        let hints = self.meta.hints.get_or_insert_with(ProviderConfig::new);
        for entry in entries {
            hints.push(entry);
        }
        self
    }

    /// Caches instances in the local/shared cache.
    pub fn singleton(&mut self) -> &mut Self {
        self.meta.singleton = true;
        self
    }

    /// Caches instances in the global namespace cache.
    pub fn global(&mut self) -> &mut Self {
        self.meta.global = true;
        self
    }
}

/// Resolved constructor arguments, consumed in declared order.
pub struct Arguments {
    class: &'static str,
    values: ArgVec<AnyArc>,
    cursor: usize,
}

impl Arguments {
    pub(crate) fn new(class: &'static str, values: ArgVec<AnyArc>) -> Self {
        Self { class, values, cursor: 0 }
    }

    /// Takes the next argument as `Arc<V>`.
    pub fn next<V: Any + Send + Sync>(&mut self) -> DiResult<Arc<V>> {
        self.next_any()?
            .downcast::<V>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<V>()))
    }

    /// Takes the next argument and clones the value out of its `Arc`.
    pub fn next_cloned<V: Any + Send + Sync + Clone>(&mut self) -> DiResult<V> {
        self.next::<V>().map(|value| (*value).clone())
    }

    /// Takes the next argument without downcasting.
    pub fn next_any(&mut self) -> DiResult<AnyArc> {
        let value = self.values.get(self.cursor).cloned().ok_or(DiError::MissingArgument {
            class: self.class,
            index: self.cursor,
        })?;
        self.cursor += 1;
        Ok(value)
    }

    /// Number of arguments not yet taken.
    pub fn remaining(&self) -> usize {
        self.values.len() - self.cursor
    }

    /// Total number of resolved arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the class declares no parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
