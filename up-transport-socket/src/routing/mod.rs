//! Routing layer: pattern-key derivation, wildcard variant enumeration, and
//! the concurrent listener registry those keys index.

pub(crate) mod listener_registry;
pub(crate) mod pattern_variants;
pub(crate) mod uri_pattern_key;
