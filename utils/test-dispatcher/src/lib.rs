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

//! In-process stand-in for the central dispatcher: relays every frame
//! received from any connected client to every connected client, including
//! the sender, preserving per-sender arrival order.
//!
//! Test utility only; slow clients that fall behind the relay bus drop the
//! missed frames with a warning rather than exerting backpressure.

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use std::io;
use std::net::SocketAddr;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, warn};

use up_transport_socket::FrameCodec;

const COMPONENT: &str = "test_dispatcher";
const RELAY_BUS_CAPACITY: usize = 256;

/// Broadcast relay bound to a local TCP address. Bind to `"127.0.0.1:0"` for
/// an ephemeral port and hand [`TestDispatcher::local_addr`] to the
/// transports under test.
pub struct TestDispatcher {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    accept_task: Mutex<Option<JoinHandle<()>>>,
}

impl TestDispatcher {
    /// Binds the relay and starts accepting clients.
    pub async fn bind(addr: impl ToSocketAddrs) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (relay_bus, _) = broadcast::channel(RELAY_BUS_CAPACITY);
        let accept_task = tokio::spawn(accept_loop(listener, relay_bus, shutdown_rx));

        debug!(
            component = COMPONENT,
            addr = %local_addr,
            "test dispatcher listening"
        );
        Ok(Self {
            local_addr,
            shutdown_tx,
            accept_task: Mutex::new(Some(accept_task)),
        })
    }

    /// The bound address clients connect to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting and relaying. Idempotent; only the first caller joins
    /// the accept task.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        let accept_task = self.accept_task.lock().await.take();
        if let Some(task) = accept_task {
            let _ = task.await;
        }
    }
}

impl Drop for TestDispatcher {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

async fn accept_loop(
    listener: TcpListener,
    relay_bus: broadcast::Sender<Bytes>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    debug!(component = COMPONENT, peer = %peer, "client connected");
                    let (read_half, write_half) = stream.into_split();
                    // Subscribe before the reader task can publish, so this
                    // client never misses its own earliest frames.
                    let relayed = relay_bus.subscribe();
                    tokio::spawn(relay_inbound(
                        FramedRead::new(read_half, FrameCodec),
                        relay_bus.clone(),
                        shutdown_rx.clone(),
                    ));
                    tokio::spawn(relay_outbound(
                        FramedWrite::new(write_half, FrameCodec),
                        relayed,
                        shutdown_rx.clone(),
                    ));
                }
                Err(err) => {
                    warn!(component = COMPONENT, err = %err, "accept failed; stopping");
                    break;
                }
            }
        }
    }
}

async fn relay_inbound(
    mut frames: FramedRead<OwnedReadHalf, FrameCodec>,
    relay_bus: broadcast::Sender<Bytes>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            frame = frames.next() => match frame {
                Some(Ok(frame)) => {
                    // A send error only means no client is currently
                    // subscribed; the frame is simply dropped.
                    let _ = relay_bus.send(frame.freeze());
                }
                Some(Err(err)) => {
                    warn!(component = COMPONENT, err = %err, "client read failed");
                    break;
                }
                None => break,
            }
        }
    }
}

async fn relay_outbound(
    mut sink: FramedWrite<OwnedWriteHalf, FrameCodec>,
    mut relayed: broadcast::Receiver<Bytes>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => break,
            frame = relayed.recv() => match frame {
                Ok(frame) => {
                    if sink.send(frame).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(component = COMPONENT, skipped, "client lagged the relay bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}
