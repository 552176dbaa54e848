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

//! Canonical structured field keys and value-format helpers.

use up_rust::{UMessage, UUri};

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";

pub const MSG_ID: &str = "msg_id";
pub const SRC: &str = "src";
pub const SOURCE_FILTER: &str = "source_filter";
pub const DISPATCHER: &str = "dispatcher";
pub const REASON: &str = "reason";
pub const ERR: &str = "err";

pub const NONE: &str = "none";
pub const REASON_SHUTDOWN_SIGNAL: &str = "shutdown_signal";
pub const REASON_STREAM_CLOSED: &str = "stream_closed";
pub const REASON_READ_FAILED: &str = "read_failed";

pub fn format_message_id(message: &UMessage) -> String {
    message
        .attributes
        .as_ref()
        .and_then(|attributes| attributes.id.as_ref())
        .map(|id| id.to_hyphenated_string())
        .unwrap_or_else(|| NONE.to_string())
}

pub fn format_source_uri(message: &UMessage) -> String {
    format_optional_uri(
        message
            .attributes
            .as_ref()
            .and_then(|attributes| attributes.source.as_ref()),
    )
}

pub fn format_uri(uri: &UUri) -> String {
    uri.to_uri(false).trim_start_matches("//").to_string()
}

fn format_optional_uri(uri: Option<&UUri>) -> String {
    uri.map(format_uri).unwrap_or_else(|| NONE.to_string())
}
