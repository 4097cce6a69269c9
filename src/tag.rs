//! Dependency tags for provider lookup and caching.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::class::{Class, Injectable};

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(1);

/// Unique opaque token.
///
/// Every call to [`Symbol::new`] yields a token distinct from all others,
/// even when the descriptions match. Clones compare equal to the original.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::Symbol;
///
/// let a = Symbol::new("logger");
/// let b = Symbol::new("logger");
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
/// assert_eq!(a.description(), "logger");
/// ```
#[derive(Debug, Clone)]
pub struct Symbol {
    id: u64,
    description: Cow<'static, str>,
}

impl Symbol {
    /// Allocates a fresh symbol with a description used only for display.
    pub fn new(description: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            description: description.into(),
        }
    }

    /// Description given at creation.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for Symbol {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description)
    }
}

/// Identifier of a dependency.
///
/// Tags key both the provider registry and the dependency a constructor
/// parameter or property asks for. They compare by identity, never by
/// structure:
///
/// - **Class**: a constructible type; eligible for autowiring
/// - **Type**: any other Rust type, used as a declared parameter type
/// - **Name**: an opaque string
/// - **Symbol**: a unique token
///
/// `Class` and `Type` tags for the same Rust type are equal, so a provider
/// registered under `Tag::of_type::<T>()` also answers `Tag::of::<T>()`.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Arguments, DiResult, Injectable, Tag};
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn construct(_: &mut Arguments) -> DiResult<Self> {
///         Ok(Clock)
///     }
/// }
///
/// assert!(Tag::of::<Clock>().is_constructible());
/// assert!(!Tag::of_type::<String>().is_constructible());
/// assert_eq!(Tag::of::<Clock>(), Tag::of_type::<Clock>());
/// assert_eq!(Tag::name("PORT"), Tag::from("PORT"));
/// ```
#[derive(Debug, Clone)]
pub enum Tag {
    /// Constructible type
    Class(Class),
    /// Non-constructible type with TypeId and name for diagnostics
    Type(TypeId, &'static str),
    /// String name
    Name(Cow<'static, str>),
    /// Unique token
    Symbol(Symbol),
}

impl Tag {
    /// Tag for a constructible type.
    pub fn of<T: Injectable>() -> Self {
        Tag::Class(Class::of::<T>())
    }

    /// Tag for a plain Rust type that the resolver cannot construct itself.
    pub fn of_type<T: Any>() -> Self {
        Tag::Type(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    /// Tag for an opaque name.
    pub fn name(name: impl Into<Cow<'static, str>>) -> Self {
        Tag::Name(name.into())
    }

    /// Tag backed by a fresh [`Symbol`].
    pub fn symbol(description: impl Into<Cow<'static, str>>) -> Self {
        Tag::Symbol(Symbol::new(description))
    }

    /// Whether autowiring may treat this tag as its own provider.
    pub fn is_constructible(&self) -> bool {
        matches!(self, Tag::Class(_))
    }

    /// The class behind a constructible tag.
    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Tag::Class(class) => Some(class),
            _ => None,
        }
    }

    /// TypeId for type tags, `None` for names and symbols.
    pub fn type_identity(&self) -> Option<TypeId> {
        match self {
            Tag::Class(class) => Some(class.id()),
            Tag::Type(id, _) => Some(*id),
            Tag::Name(_) | Tag::Symbol(_) => None,
        }
    }
}

impl PartialEq for Tag {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Tag::Name(a), Tag::Name(b)) => a == b,
            (Tag::Symbol(a), Tag::Symbol(b)) => a == b,
            _ => match (self.type_identity(), other.type_identity()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            // Class and Type share a discriminant so equal tags hash alike
            Tag::Class(class) => {
                0u8.hash(state);
                class.id().hash(state);
            }
            Tag::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Tag::Name(name) => {
                1u8.hash(state);
                name.hash(state);
            }
            Tag::Symbol(symbol) => {
                2u8.hash(state);
                symbol.hash(state);
            }
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Class(class) => f.write_str(class.name()),
            Tag::Type(_, name) => f.write_str(name),
            Tag::Name(name) => f.write_str(name),
            Tag::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

impl From<&'static str> for Tag {
    fn from(name: &'static str) -> Self {
        Tag::Name(Cow::Borrowed(name))
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Tag::Name(Cow::Owned(name))
    }
}

impl From<Symbol> for Tag {
    fn from(symbol: Symbol) -> Self {
        Tag::Symbol(symbol)
    }
}

impl From<Class> for Tag {
    fn from(class: Class) -> Self {
        Tag::Class(class)
    }
}
