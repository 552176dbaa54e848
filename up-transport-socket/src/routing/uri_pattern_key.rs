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

//! Partial match key projected from a `UUri`, with wildcard sentinels mapping
//! to absent positions.

use up_rust::UUri;

/// Authority value meaning "any authority" in a filter URI.
pub const WILDCARD_AUTHORITY: &str = "*";
/// Entity-id value meaning "any entity" in a filter URI.
pub const WILDCARD_ENTITY_ID: u32 = 0xFFFF;
/// Major-version value meaning "any version" in a filter URI.
pub const WILDCARD_VERSION_MAJOR: u32 = 0xFFFF;
/// Resource-id value meaning "any resource" in a filter URI.
pub const WILDCARD_RESOURCE_ID: u32 = 0xFFFF;

/// Registry lookup key: one position per routing attribute, absent where the
/// source URI carried the attribute's wildcard sentinel.
///
/// Keys compare positionwise, so a key derived from a message source and a
/// key derived from a registration filter meet in the same map slot exactly
/// when every position is either both-absent or both-present-and-equal.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct UriPatternKey {
    pub(crate) authority: Option<String>,
    pub(crate) entity_id: Option<u32>,
    pub(crate) version_major: Option<u32>,
    pub(crate) resource_id: Option<u32>,
}

impl From<&UUri> for UriPatternKey {
    fn from(uri: &UUri) -> Self {
        Self {
            authority: (uri.authority_name != WILDCARD_AUTHORITY)
                .then(|| uri.authority_name.clone()),
            entity_id: (uri.ue_id != WILDCARD_ENTITY_ID).then_some(uri.ue_id),
            version_major: (uri.ue_version_major != WILDCARD_VERSION_MAJOR)
                .then_some(uri.ue_version_major),
            resource_id: (uri.resource_id != WILDCARD_RESOURCE_ID).then_some(uri.resource_id),
        }
    }
}

impl From<UUri> for UriPatternKey {
    fn from(uri: UUri) -> Self {
        Self::from(&uri)
    }
}
