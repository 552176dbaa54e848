/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Enumeration of every registration pattern a key can match: the powerset of
//! its present positions, generalized to absent.

use crate::routing::uri_pattern_key::UriPatternKey;
use std::collections::HashSet;

const PATTERN_POSITIONS: u32 = 4;
const VARIANT_COUNT: u32 = 1 << PATTERN_POSITIONS;

/// Produces all 16 generalizations of `key`, one per clear-position bitmask.
///
/// Mask 0 comes first and leaves the key unchanged. Clearing a position that
/// is already absent is a no-op, so masks that only differ on absent
/// positions produce repeated elements; callers that feed a registry lookup
/// must dedupe first (see [`matching_variants`]).
pub(crate) fn enumerate_variants(key: &UriPatternKey) -> Vec<UriPatternKey> {
    let mut variants = Vec::with_capacity(VARIANT_COUNT as usize);
    for mask in 0..VARIANT_COUNT {
        let mut variant = key.clone();
        if mask & 0b0001 != 0 {
            variant.authority = None;
        }
        if mask & 0b0010 != 0 {
            variant.entity_id = None;
        }
        if mask & 0b0100 != 0 {
            variant.version_major = None;
        }
        if mask & 0b1000 != 0 {
            variant.resource_id = None;
        }
        variants.push(variant);
    }
    variants
}

/// The distinct generalizations of `key` in first-occurrence order, so the
/// input key stays first and every registry pattern is visited at most once
/// per dispatched message.
pub(crate) fn matching_variants(key: &UriPatternKey) -> Vec<UriPatternKey> {
    let mut seen = HashSet::with_capacity(VARIANT_COUNT as usize);
    enumerate_variants(key)
        .into_iter()
        .filter(|variant| seen.insert(variant.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{enumerate_variants, matching_variants, VARIANT_COUNT};
    use crate::routing::uri_pattern_key::UriPatternKey;

    fn concrete_key() -> UriPatternKey {
        UriPatternKey {
            authority: Some("vehicle-a".to_string()),
            entity_id: Some(0x0A),
            version_major: Some(0x01),
            resource_id: Some(0x8001),
        }
    }

    fn fully_wildcard_key() -> UriPatternKey {
        UriPatternKey {
            authority: None,
            entity_id: None,
            version_major: None,
            resource_id: None,
        }
    }

    #[test]
    fn enumeration_yields_sixteen_variants_with_input_first() {
        let key = concrete_key();

        let variants = enumerate_variants(&key);

        assert_eq!(variants.len(), VARIANT_COUNT as usize);
        assert_eq!(variants[0], key);
    }

    #[test]
    fn fully_concrete_key_has_sixteen_distinct_variants() {
        let variants = matching_variants(&concrete_key());

        assert_eq!(variants.len(), 16);
        assert!(variants.contains(&fully_wildcard_key()));
    }

    #[test]
    fn distinct_variant_count_is_two_to_the_present_positions() {
        let two_present = UriPatternKey {
            authority: Some("vehicle-a".to_string()),
            entity_id: Some(0x0A),
            version_major: None,
            resource_id: None,
        };

        let variants = matching_variants(&two_present);

        assert_eq!(variants.len(), 4);
        assert_eq!(variants[0], two_present);
        assert!(variants.contains(&fully_wildcard_key()));
    }

    #[test]
    fn clearing_an_absent_position_is_a_no_op() {
        let variants = matching_variants(&fully_wildcard_key());

        assert_eq!(variants, vec![fully_wildcard_key()]);
    }

    #[test]
    fn dedupe_preserves_first_occurrence_order() {
        let key = UriPatternKey {
            authority: Some("vehicle-a".to_string()),
            entity_id: None,
            version_major: None,
            resource_id: None,
        };

        let variants = matching_variants(&key);

        assert_eq!(variants, vec![key, fully_wildcard_key()]);
    }

    #[test]
    fn every_variant_generalizes_the_input() {
        let key = concrete_key();

        for variant in enumerate_variants(&key) {
            for (variant_position, key_position) in [
                (&variant.authority, &key.authority),
                (
                    &variant.entity_id.map(|v| v.to_string()),
                    &key.entity_id.map(|v| v.to_string()),
                ),
            ] {
                if let Some(value) = variant_position {
                    assert_eq!(Some(value), key_position.as_ref());
                }
            }
            assert!(variant.version_major.is_none() || variant.version_major == key.version_major);
            assert!(variant.resource_id.is_none() || variant.resource_id == key.resource_id);
        }
    }
}
