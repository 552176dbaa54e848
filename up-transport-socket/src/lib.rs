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

//! # up-transport-socket
//!
//! `up-transport-socket` implements `up_rust::UTransport` over one TCP
//! connection to a central dispatcher process. Outbound messages are
//! serialized and written as length-prefixed frames; inbound frames are
//! decoded on a background dispatch task and routed to registered listeners
//! by partial-wildcard matching on the message source.
//!
//! A registration filter wildcards any subset of the four routing attributes
//! (authority `"*"`, entity id / major version / resource id `0xFFFF`); a
//! listener receives every inbound message whose source generalizes onto its
//! filter.
//!
//! ```no_run
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use up_rust::{UListener, UMessage, UTransport, UUri};
//! use up_transport_socket::{
//!     UTransportSocket, DEFAULT_DISPATCHER_HOST, DEFAULT_DISPATCHER_PORT,
//!     WILDCARD_AUTHORITY, WILDCARD_RESOURCE_ID, WILDCARD_VERSION_MAJOR,
//! };
//!
//! struct PrintingListener;
//!
//! #[async_trait]
//! impl UListener for PrintingListener {
//!     async fn on_receive(&self, msg: UMessage) {
//!         println!("received: {msg:?}");
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let local_uri = UUri {
//!     authority_name: "vehicle-a".to_string(),
//!     ue_id: 0x0A,
//!     ue_version_major: 0x01,
//!     ..Default::default()
//! };
//! let transport =
//!     UTransportSocket::new(local_uri, DEFAULT_DISPATCHER_HOST, DEFAULT_DISPATCHER_PORT)
//!         .await
//!         .unwrap();
//!
//! // Match entity 0x0A on any authority, any version, any resource.
//! let filter = UUri {
//!     authority_name: WILDCARD_AUTHORITY.to_string(),
//!     ue_id: 0x0A,
//!     ue_version_major: WILDCARD_VERSION_MAJOR,
//!     resource_id: WILDCARD_RESOURCE_ID,
//!     ..Default::default()
//! };
//! transport
//!     .register_listener(&filter, None, Arc::new(PrintingListener))
//!     .await
//!     .unwrap();
//!
//! // ... send and receive ...
//!
//! transport.shutdown().await;
//! # });
//! ```
//!
//! ## Internal architecture map
//!
//! - Routing: pattern-key derivation, wildcard variant enumeration, and the
//!   per-entry-locked listener registry
//! - Wire: length-prefix frame codec and the connected dispatcher socket
//! - Dispatch: the background read/decode/fan-out loop
//! - Façade: the outward [`UTransportSocket`] surface
//!
//! ## Observability model
//!
//! The crate uses `tracing` for logs/events. Library code emits events and
//! does not install a global subscriber; binaries and tests are responsible
//! for one-time `tracing_subscriber` initialization at process boundaries.

mod dispatch;
#[doc(hidden)]
pub mod observability;
mod routing;
mod transport;
mod wire;

pub use routing::uri_pattern_key::{
    WILDCARD_AUTHORITY, WILDCARD_ENTITY_ID, WILDCARD_RESOURCE_ID, WILDCARD_VERSION_MAJOR,
};
pub use transport::{UTransportSocket, DEFAULT_DISPATCHER_HOST, DEFAULT_DISPATCHER_PORT};
pub use wire::frame_codec::{FrameCodec, MAX_FRAME_LEN};
