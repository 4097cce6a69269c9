//! Per-build provider registry.

use crate::internal::FastMap;
use crate::provider::{Provider, ProviderConfig};
use crate::tag::Tag;

/// Mapping from tag to provider for one class build.
///
/// Built fresh for every class being constructed: caller-supplied entries
/// first, then the class's own hints for tags the caller left open. No
/// validation happens here; a provider without a strategy is only reported
/// when a dependency actually resolves through it.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Provider, ProviderConfig, ProviderRegistry, Tag};
///
/// let caller = ProviderConfig::new().with(Provider::new("X").use_value(2i32));
/// let hints = ProviderConfig::new()
///     .with(Provider::new("X").use_value(1i32))
///     .with(Provider::new("Y").use_value(3i32));
///
/// let registry = ProviderRegistry::build(&caller, Some(&hints));
/// assert_eq!(registry.len(), 2);
/// assert!(registry.contains(&Tag::name("Y")));
/// ```
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: FastMap<Tag, Provider>,
}

impl ProviderRegistry {
    /// Merges caller providers over class hints; the caller always wins.
    pub fn build(config: &ProviderConfig, hints: Option<&ProviderConfig>) -> Self {
        let mut providers = FastMap::default();

        for entry in config {
            providers.insert(entry.tag(), entry.to_provider());
        }

        if let Some(hints) = hints {
            for hint in hints {
                providers.entry(hint.tag()).or_insert_with(|| hint.to_provider());
            }
        }

        Self { providers }
    }

    /// Provider registered for `tag`.
    #[inline]
    pub fn get(&self, tag: &Tag) -> Option<&Provider> {
        self.providers.get(tag)
    }

    /// Whether `tag` has a provider.
    #[inline]
    pub fn contains(&self, tag: &Tag) -> bool {
        self.providers.contains_key(tag)
    }

    /// Registered tags, in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.providers.keys()
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
