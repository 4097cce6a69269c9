//! Partition keys for the global singleton cache.

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::tag::Symbol;

static CONTAINER_INDEX: AtomicU64 = AtomicU64::new(1);

/// Key into the global namespace cache.
///
/// Global singletons live in one map per namespace. [`Namespace::Default`]
/// is what the free `create`/`build` functions use unless told otherwise;
/// containers get a fresh [`Namespace::unique`] value so that two containers
/// never share globals unless they are given the same namespace explicitly.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::Namespace;
///
/// assert_eq!(Namespace::default(), Namespace::Default);
/// assert_eq!(Namespace::from("ABC"), Namespace::from(String::from("ABC")));
/// assert_ne!(Namespace::unique(), Namespace::unique());
/// assert!(Namespace::default().is_default());
/// assert!(!Namespace::unique().is_default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Namespace {
    /// The implicit process-wide namespace
    #[default]
    Default,
    /// A namespace chosen by name
    Name(Cow<'static, str>),
    /// A namespace that only holders of the symbol can reach
    Symbol(Symbol),
}

impl Namespace {
    /// Fresh namespace distinct from every other, labelled for diagnostics.
    pub fn unique() -> Self {
        let index = CONTAINER_INDEX.fetch_add(1, Ordering::Relaxed);
        Namespace::Symbol(Symbol::new(format!("ferrous-ioc:container_{}", index)))
    }

    /// Whether this is the implicit default namespace.
    pub fn is_default(&self) -> bool {
        matches!(self, Namespace::Default)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Default => f.write_str("<default>"),
            Namespace::Name(name) => f.write_str(name),
            Namespace::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

impl From<&'static str> for Namespace {
    fn from(name: &'static str) -> Self {
        Namespace::Name(Cow::Borrowed(name))
    }
}

impl From<String> for Namespace {
    fn from(name: String) -> Self {
        Namespace::Name(Cow::Owned(name))
    }
}

impl From<Symbol> for Namespace {
    fn from(symbol: Symbol) -> Self {
        Namespace::Symbol(symbol)
    }
}

impl From<Option<Namespace>> for Namespace {
    fn from(namespace: Option<Namespace>) -> Self {
        namespace.unwrap_or_default()
    }
}
