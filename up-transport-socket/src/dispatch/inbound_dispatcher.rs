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

//! Background loop that reads inbound frames and fans decoded messages out
//! to every listener registered under a matching pattern.

use crate::observability::{events, fields};
use crate::routing::listener_registry::ListenerRegistry;
use crate::routing::pattern_variants::matching_variants;
use crate::routing::uri_pattern_key::UriPatternKey;
use bytes::BytesMut;
use futures::{Stream, StreamExt};
use protobuf::Message;
use std::io;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn, Level};
use up_rust::UMessage;

const COMPONENT: &str = "inbound_dispatcher";

/// Runs until the shutdown signal fires, the peer closes the stream, or the
/// read fails. Generic over the frame source so the routing behavior is
/// testable without sockets.
///
/// Frames are processed strictly in arrival order; listener invocation is
/// sequential on this task, so a slow listener delays everything behind it.
pub(crate) async fn run_dispatch_loop<S>(
    mut frames: S,
    mut shutdown_rx: watch::Receiver<bool>,
    registry: Arc<ListenerRegistry>,
) where
    S: Stream<Item = io::Result<BytesMut>> + Unpin,
{
    loop {
        tokio::select! {
            // A dropped sender counts as shutdown too.
            _ = shutdown_rx.changed() => {
                info!(
                    event = events::DISPATCH_STOPPED,
                    component = COMPONENT,
                    reason = fields::REASON_SHUTDOWN_SIGNAL,
                    "stopping dispatch loop"
                );
                break;
            }
            frame = frames.next() => match frame {
                None => {
                    info!(
                        event = events::DISPATCH_STOPPED,
                        component = COMPONENT,
                        reason = fields::REASON_STREAM_CLOSED,
                        "peer closed the connection; stopping dispatch loop"
                    );
                    break;
                }
                Some(Err(err)) => {
                    error!(
                        event = events::DISPATCH_STOPPED,
                        component = COMPONENT,
                        reason = fields::REASON_READ_FAILED,
                        err = %err,
                        "read failed; stopping dispatch loop"
                    );
                    break;
                }
                Some(Ok(frame)) => dispatch_frame(&registry, &frame).await,
            }
        }
    }
}

/// Decodes one frame and invokes every matching listener. A frame that fails
/// to decode is dropped; nothing downstream of it is affected.
async fn dispatch_frame(registry: &ListenerRegistry, frame: &[u8]) {
    let message = match UMessage::parse_from_bytes(frame) {
        Ok(message) => message,
        Err(err) => {
            warn!(
                event = events::DISPATCH_DECODE_FAILED,
                component = COMPONENT,
                frame_len = frame.len(),
                err = %err,
                "dropping frame that does not decode as a UMessage"
            );
            return;
        }
    };

    // An unset source decodes as an all-defaults UUri, which is a fully
    // concrete key under proto3 semantics.
    let source_key = UriPatternKey::from(message.attributes.source.get_or_default());

    let mut matched_patterns = 0usize;
    let mut invoked_listeners = 0usize;
    for variant in matching_variants(&source_key) {
        if let Some(entry) = registry.find(&variant).await {
            matched_patterns += 1;
            invoked_listeners += entry.invoke_all(&message).await;
        }
    }

    if tracing::enabled!(Level::DEBUG) {
        debug!(
            event = events::DISPATCH_DELIVERED,
            component = COMPONENT,
            msg_id = fields::format_message_id(&message).as_str(),
            src = fields::format_source_uri(&message).as_str(),
            matched_patterns,
            invoked_listeners,
            "delivered inbound message"
        );
    }
}
