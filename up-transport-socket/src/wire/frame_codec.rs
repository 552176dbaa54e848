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

//! Length-prefix framing for serialized messages on the dispatcher stream.
//!
//! TCP preserves no message boundaries, so every frame carries a 4-byte
//! big-endian payload length followed by exactly that many payload bytes.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};

/// Largest payload one frame may carry.
pub const MAX_FRAME_LEN: usize = 8 * 1024 * 1024;

const FRAME_HEADER_LEN: usize = 4;

/// Codec shared by the transport and any dispatcher peer: 4-byte big-endian
/// length prefix, one serialized `UMessage` per frame.
///
/// A declared length above [`MAX_FRAME_LEN`] means the stream is corrupt (or
/// the peer speaks a different protocol) and surfaces as an
/// [`io::ErrorKind::InvalidData`] error, which terminates the framed read.
#[derive(Clone, Debug, Default)]
pub struct FrameCodec;

impl Decoder for FrameCodec {
    type Item = BytesMut;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < FRAME_HEADER_LEN {
            return Ok(None);
        }

        let mut header = [0u8; FRAME_HEADER_LEN];
        header.copy_from_slice(&src[..FRAME_HEADER_LEN]);
        let payload_len = u32::from_be_bytes(header) as usize;

        if payload_len > MAX_FRAME_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("frame length {payload_len} exceeds maximum {MAX_FRAME_LEN}"),
            ));
        }

        if src.len() < FRAME_HEADER_LEN + payload_len {
            src.reserve(FRAME_HEADER_LEN + payload_len - src.len());
            return Ok(None);
        }

        src.advance(FRAME_HEADER_LEN);
        Ok(Some(src.split_to(payload_len)))
    }
}

impl Encoder<Bytes> for FrameCodec {
    type Error = io::Error;

    fn encode(&mut self, payload: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if payload.len() > MAX_FRAME_LEN {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("payload length {} exceeds maximum {MAX_FRAME_LEN}", payload.len()),
            ));
        }

        dst.reserve(FRAME_HEADER_LEN + payload.len());
        dst.put_u32(payload.len() as u32);
        dst.extend_from_slice(&payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameCodec, FRAME_HEADER_LEN, MAX_FRAME_LEN};
    use bytes::{Bytes, BytesMut};
    use std::io;
    use tokio_util::codec::{Decoder, Encoder};

    #[test]
    fn encode_then_decode_yields_the_payload() {
        let mut codec = FrameCodec;
        let mut buffer = BytesMut::new();

        codec
            .encode(Bytes::from_static(b"routed payload"), &mut buffer)
            .expect("payload should encode");

        let decoded = codec
            .decode(&mut buffer)
            .expect("frame should decode")
            .expect("frame should be complete");
        assert_eq!(&decoded[..], b"routed payload");
        assert!(buffer.is_empty());
    }

    #[test]
    fn partial_header_decodes_to_none() {
        let mut codec = FrameCodec;
        let mut buffer = BytesMut::from(&[0u8, 0][..]);

        assert!(codec.decode(&mut buffer).expect("short header is not an error").is_none());
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn partial_body_decodes_to_none_until_complete() {
        let mut codec = FrameCodec;
        let mut buffer = BytesMut::new();
        buffer.extend_from_slice(&8u32.to_be_bytes());
        buffer.extend_from_slice(b"half");

        assert!(codec.decode(&mut buffer).expect("short body is not an error").is_none());

        buffer.extend_from_slice(b"full");
        let decoded = codec
            .decode(&mut buffer)
            .expect("frame should decode")
            .expect("frame should now be complete");
        assert_eq!(&decoded[..], b"halffull");
    }

    #[test]
    fn frame_assembled_byte_by_byte_still_decodes() {
        let mut codec = FrameCodec;
        let mut wire = BytesMut::new();
        codec
            .encode(Bytes::from_static(b"trickled"), &mut wire)
            .expect("payload should encode");

        let mut buffer = BytesMut::new();
        let mut decoded = None;
        for byte in wire.iter() {
            buffer.extend_from_slice(&[*byte]);
            if let Some(frame) = codec.decode(&mut buffer).expect("no framing error expected") {
                decoded = Some(frame);
            }
        }

        assert_eq!(&decoded.expect("frame should complete on the last byte")[..], b"trickled");
    }

    #[test]
    fn consecutive_frames_decode_in_order() {
        let mut codec = FrameCodec;
        let mut buffer = BytesMut::new();
        codec
            .encode(Bytes::from_static(b"first"), &mut buffer)
            .expect("first payload should encode");
        codec
            .encode(Bytes::from_static(b"second"), &mut buffer)
            .expect("second payload should encode");

        let first = codec.decode(&mut buffer).expect("decode ok").expect("first frame");
        let second = codec.decode(&mut buffer).expect("decode ok").expect("second frame");
        assert_eq!(&first[..], b"first");
        assert_eq!(&second[..], b"second");
        assert!(codec.decode(&mut buffer).expect("decode ok").is_none());
    }

    #[test]
    fn oversize_length_prefix_is_invalid_data() {
        let mut codec = FrameCodec;
        let mut buffer = BytesMut::new();
        buffer.extend_from_slice(&((MAX_FRAME_LEN as u32) + 1).to_be_bytes());

        let err = codec.decode(&mut buffer).expect_err("oversize prefix must fail");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn oversize_payload_refuses_to_encode() {
        let mut codec = FrameCodec;
        let mut buffer = BytesMut::new();
        let payload = Bytes::from(vec![0u8; MAX_FRAME_LEN + 1]);

        let err = codec.encode(payload, &mut buffer).expect_err("oversize payload must fail");
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(buffer.is_empty());
    }

    #[test]
    fn empty_payload_is_a_valid_frame() {
        let mut codec = FrameCodec;
        let mut buffer = BytesMut::new();

        codec.encode(Bytes::new(), &mut buffer).expect("empty payload should encode");
        assert_eq!(buffer.len(), FRAME_HEADER_LEN);

        let decoded = codec
            .decode(&mut buffer)
            .expect("frame should decode")
            .expect("frame should be complete");
        assert!(decoded.is_empty());
    }
}
