//! Discriminated variant registries.
//!
//! A registry is a closed Rust enum whose variants are serialized as string
//! tags. Each variant selects the schema its adjacent payload field must
//! satisfy. The tag table and the variant → schema mapping are both resolved
//! at compile time, so a known tag always has a schema.

use crate::error::ValidationError;
use serde_json::Value;
use std::fmt;

/// A tag that does not name any variant of a registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownVariant {
    /// Human name of the registry, e.g. `target type`.
    pub registry: &'static str,
    pub tag: String,
    /// Every legal tag, sorted.
    pub expected: Vec<&'static str>,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unrecognized {} '{}'; expected one of: {}",
            self.registry,
            self.tag,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for UnknownVariant {}

/// A registry entry: a tag plus the payload schema it selects.
pub trait Variant: Copy + Eq + fmt::Debug + 'static {
    /// The resolved payload type shared by every variant of the registry.
    type Payload;

    /// Human name of the registry, used in error messages.
    const REGISTRY: &'static str;

    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    fn tag(self) -> &'static str;

    /// Validate `value` against the schema this variant selects.
    ///
    /// Errors are appended to `errors` with paths rooted at `path`.
    fn resolve(
        self,
        value: &Value,
        path: &str,
        errors: &mut Vec<ValidationError>,
    ) -> Option<Self::Payload>;

    fn from_tag(tag: &str) -> Result<Self, UnknownVariant> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.tag() == tag)
            .ok_or_else(|| UnknownVariant {
                registry: Self::REGISTRY,
                tag: tag.to_string(),
                expected: Self::tags(),
            })
    }

    /// Legal tags, sorted.
    fn tags() -> Vec<&'static str> {
        let mut tags: Vec<_> = Self::VARIANTS.iter().map(|v| v.tag()).collect();
        tags.sort_unstable();
        tags
    }
}
