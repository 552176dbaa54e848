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

//! Connected dispatcher socket, split into a writer owned here and a framed
//! reader handed to the dispatch loop.

use crate::wire::frame_codec::FrameCodec;
use bytes::Bytes;
use futures::SinkExt;
use std::io;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::codec::{FramedRead, FramedWrite};

/// Framed read half of the dispatcher connection, consumed by the dispatch
/// loop as its single reader.
pub(crate) type InboundFrames = FramedRead<OwnedReadHalf, FrameCodec>;

/// Write side of the dispatcher connection. The write half sits behind a lock
/// so concurrent senders emit whole frames, never interleaved bytes.
pub(crate) struct SocketConnection {
    writer: Mutex<FramedWrite<OwnedWriteHalf, FrameCodec>>,
}

impl SocketConnection {
    /// Connects to the dispatcher endpoint and splits the stream. Connection
    /// failure is returned to the caller; no half-connected state exists.
    pub(crate) async fn connect(host: &str, port: u16) -> io::Result<(Self, InboundFrames)> {
        let stream = TcpStream::connect((host, port)).await?;
        let (read_half, write_half) = stream.into_split();

        let connection = Self {
            writer: Mutex::new(FramedWrite::new(write_half, FrameCodec)),
        };
        Ok((connection, FramedRead::new(read_half, FrameCodec)))
    }

    /// Writes one frame, flushing it onto the wire before releasing the
    /// write lock.
    pub(crate) async fn send_frame(&self, payload: Bytes) -> io::Result<()> {
        self.writer.lock().await.send(payload).await
    }
}
