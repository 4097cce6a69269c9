//! Error types for the IoC resolver.

use std::fmt;

use crate::tag::Tag;

/// Resolution errors
///
/// Every variant is terminal for the build call that produced it and is
/// caused by configuration the caller can correct: retrying with the same
/// providers fails the same way.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{DiError, Tag};
///
/// let unknown = DiError::UnknownProvider(Tag::name("DATABASE_URL"));
/// assert_eq!(unknown.to_string(), "Unknown provider: DATABASE_URL");
///
/// let circular = DiError::Circular(vec!["A", "B", "A"]);
/// assert_eq!(circular.to_string(), "Circular dependency: A -> B -> A");
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// No provider registered for the tag and it cannot be autowired
    UnknownProvider(Tag),
    /// A provider was found for the tag but names no value, factory, or class
    InvalidProvider(Tag),
    /// A resolved value could not be downcast to the requested type
    TypeMismatch(&'static str),
    /// A constructor read more arguments than its class declares
    MissingArgument {
        /// Class being constructed
        class: &'static str,
        /// Zero-based position of the missing argument
        index: usize,
    },
    /// Class re-entered while already being built (includes path)
    Circular(Vec<&'static str>),
}

impl DiError {
    /// The tag this error is about, for the two provider errors.
    pub fn tag(&self) -> Option<&Tag> {
        match self {
            DiError::UnknownProvider(tag) | DiError::InvalidProvider(tag) => Some(tag),
            _ => None,
        }
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::UnknownProvider(tag) => write!(f, "Unknown provider: {}", tag),
            DiError::InvalidProvider(tag) => write!(f, "Invalid provider: {}", tag),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::MissingArgument { class, index } => {
                write!(f, "Missing argument {} for: {}", index, class)
            }
            DiError::Circular(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for resolver operations
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{DiResult, DiError, Tag};
///
/// fn lookup(found: bool) -> DiResult<u32> {
///     if found {
///         Ok(7)
///     } else {
///         Err(DiError::UnknownProvider(Tag::name("PORT")))
///     }
/// }
///
/// assert!(lookup(true).is_ok());
/// assert!(lookup(false).is_err());
/// ```
pub type DiResult<T> = Result<T, DiError>;
