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

//! Public transport façade: construction, send, listener registration, and
//! teardown over one dispatcher connection.

use crate::dispatch::inbound_dispatcher::run_dispatch_loop;
use crate::observability::{events, fields};
use crate::routing::listener_registry::ListenerRegistry;
use crate::routing::uri_pattern_key::UriPatternKey;
use crate::wire::connection::SocketConnection;
use async_trait::async_trait;
use bytes::Bytes;
use protobuf::Message;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use up_rust::{
    ComparableListener, UCode, UListener, UMessage, UStatus, UTransport, UUri,
};

const COMPONENT: &str = "transport";

/// Dispatcher endpoint used when a deployment does not configure its own.
pub const DEFAULT_DISPATCHER_HOST: &str = "127.0.0.1";
pub const DEFAULT_DISPATCHER_PORT: u16 = 44444;

/// Socket-backed `UTransport`: one TCP connection to a central dispatcher
/// process and one background dispatch task routing inbound messages to
/// registered listeners by partial-wildcard source matching.
///
/// `send`, `register_listener`, and `unregister_listener` are safe to call
/// concurrently from any task, and concurrently with inbound dispatch.
pub struct UTransportSocket {
    local_uri: UUri,
    connection: Arc<SocketConnection>,
    registry: Arc<ListenerRegistry>,
    shutdown_tx: watch::Sender<bool>,
    dispatch_task: Mutex<Option<JoinHandle<()>>>,
}

impl UTransportSocket {
    /// Connects to the dispatcher and starts the dispatch task. Connection
    /// failure fails construction; a `UTransportSocket` that exists can send
    /// and receive.
    pub async fn new(
        local_uri: UUri,
        dispatcher_host: &str,
        dispatcher_port: u16,
    ) -> Result<Self, UStatus> {
        let (connection, inbound_frames) =
            SocketConnection::connect(dispatcher_host, dispatcher_port)
                .await
                .map_err(|err| {
                    UStatus::fail_with_code(
                        UCode::INTERNAL,
                        format!(
                            "unable to connect to dispatcher at {dispatcher_host}:{dispatcher_port}: {err}"
                        ),
                    )
                })?;

        let registry = Arc::new(ListenerRegistry::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let dispatch_task = tokio::spawn(run_dispatch_loop(
            inbound_frames,
            shutdown_rx,
            registry.clone(),
        ));

        info!(
            event = events::TRANSPORT_CONNECTED,
            component = COMPONENT,
            dispatcher = format!("{dispatcher_host}:{dispatcher_port}").as_str(),
            local_uri = fields::format_uri(&local_uri).as_str(),
            "connected to dispatcher"
        );

        Ok(Self {
            local_uri,
            connection: Arc::new(connection),
            registry,
            shutdown_tx,
            dispatch_task: Mutex::new(Some(dispatch_task)),
        })
    }

    /// The entity URI this transport was constructed with.
    pub fn local_uri(&self) -> &UUri {
        &self.local_uri
    }

    /// Stops the dispatch task and clears every registered listener.
    ///
    /// Idempotent; only the first caller joins the task. After this returns,
    /// no listener is invoked again by this transport.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);

        let dispatch_task = self.dispatch_task.lock().await.take();
        if let Some(task) = dispatch_task {
            if let Err(err) = task.await {
                warn!(
                    event = events::TRANSPORT_SHUTDOWN,
                    component = COMPONENT,
                    err = %err,
                    "dispatch task did not stop cleanly"
                );
            }
        }

        let cleared = self.registry.erase_matching(|_| true).await;
        info!(
            event = events::TRANSPORT_SHUTDOWN,
            component = COMPONENT,
            cleared_listeners = cleared,
            "transport shut down"
        );
    }
}

impl Drop for UTransportSocket {
    // A sync drop cannot join the dispatch task; the signal makes it exit
    // promptly and the detached task leaks nothing. Callers that need the
    // join guarantee call `shutdown().await` first.
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

#[async_trait]
impl UTransport for UTransportSocket {
    async fn send(&self, message: UMessage) -> Result<(), UStatus> {
        let payload = message.write_to_bytes().map_err(|err| {
            warn!(
                event = events::SEND_ENCODE_FAILED,
                component = COMPONENT,
                err = %err,
                "unable to serialize outbound message"
            );
            UStatus::fail_with_code(
                UCode::INTERNAL,
                format!("unable to serialize outbound message: {err}"),
            )
        })?;

        self.connection
            .send_frame(Bytes::from(payload))
            .await
            .map_err(|err| {
                warn!(
                    event = events::SEND_FAILED,
                    component = COMPONENT,
                    msg_id = fields::format_message_id(&message).as_str(),
                    err = %err,
                    "unable to write outbound frame"
                );
                UStatus::fail_with_code(
                    UCode::INTERNAL,
                    format!("unable to write outbound frame: {err}"),
                )
            })?;

        debug!(
            event = events::SEND_OK,
            component = COMPONENT,
            msg_id = fields::format_message_id(&message).as_str(),
            src = fields::format_source_uri(&message).as_str(),
            "sent outbound message"
        );
        Ok(())
    }

    async fn receive(
        &self,
        _source_filter: &UUri,
        _sink_filter: Option<&UUri>,
    ) -> Result<UMessage, UStatus> {
        Err(UStatus::fail_with_code(
            UCode::UNIMPLEMENTED,
            "the socket transport delivers messages via registered listeners",
        ))
    }

    async fn register_listener(
        &self,
        source_filter: &UUri,
        sink_filter: Option<&UUri>,
        listener: Arc<dyn UListener>,
    ) -> Result<(), UStatus> {
        let key = UriPatternKey::from(source_filter);
        let entry = self.registry.find_or_create(key, sink_filter.cloned()).await;
        // Re-registering the identical listener collapses to one set member
        // and still succeeds.
        let inserted = entry.insert(ComparableListener::new(listener)).await;

        debug!(
            event = events::LISTENER_REGISTERED,
            component = COMPONENT,
            source_filter = fields::format_uri(source_filter).as_str(),
            already_present = !inserted,
            "registered listener"
        );
        Ok(())
    }

    async fn unregister_listener(
        &self,
        source_filter: &UUri,
        _sink_filter: Option<&UUri>,
        listener: Arc<dyn UListener>,
    ) -> Result<(), UStatus> {
        let key = UriPatternKey::from(source_filter);
        let Some(entry) = self.registry.find(&key).await else {
            debug!(
                event = events::LISTENER_REMOVE_NOT_FOUND,
                component = COMPONENT,
                source_filter = fields::format_uri(source_filter).as_str(),
                "no listeners registered under filter"
            );
            return Err(UStatus::fail_with_code(
                UCode::NOT_FOUND,
                "no listeners registered under the given filter",
            ));
        };

        if !entry.remove(&ComparableListener::new(listener)).await {
            debug!(
                event = events::LISTENER_REMOVE_NOT_FOUND,
                component = COMPONENT,
                source_filter = fields::format_uri(source_filter).as_str(),
                "listener not registered under filter"
            );
            return Err(UStatus::fail_with_code(
                UCode::NOT_FOUND,
                "listener is not registered under the given filter",
            ));
        }

        debug!(
            event = events::LISTENER_REMOVED,
            component = COMPONENT,
            source_filter = fields::format_uri(source_filter).as_str(),
            "removed listener"
        );
        Ok(())
    }
}
