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

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use up_rust::{UAttributes, UListener, UMessage, UUri, UUID};

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Listener that records every received message.
#[derive(Clone, Default)]
pub(crate) struct CollectingListener {
    messages: Arc<Mutex<Vec<UMessage>>>,
}

impl CollectingListener {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub(crate) async fn received(&self) -> Vec<UMessage> {
        self.messages.lock().await.clone()
    }

    pub(crate) async fn count(&self) -> usize {
        self.messages.lock().await.len()
    }

    /// Polls until the listener has seen `expected` messages or the deadline
    /// passes; returns whether the count was reached.
    pub(crate) async fn wait_for_count(&self, expected: usize) -> bool {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while tokio::time::Instant::now() < deadline {
            if self.count().await >= expected {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.count().await >= expected
    }
}

#[async_trait]
impl UListener for CollectingListener {
    async fn on_receive(&self, msg: UMessage) {
        self.messages.lock().await.push(msg);
    }
}

pub(crate) fn source_uri(authority: &str) -> UUri {
    UUri {
        authority_name: authority.to_string(),
        ue_id: 0x0A,
        ue_version_major: 0x01,
        resource_id: 0x8001,
        ..Default::default()
    }
}

/// Message whose source drives routing; the id makes individual messages
/// distinguishable in order-sensitive assertions.
pub(crate) fn message_with_source(source: UUri) -> UMessage {
    UMessage {
        attributes: Some(UAttributes {
            id: Some(UUID::build()).into(),
            source: Some(source).into(),
            ..Default::default()
        })
        .into(),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub(crate) fn message_id(message: &UMessage) -> UUID {
    message
        .attributes
        .as_ref()
        .and_then(|attributes| attributes.id.as_ref())
        .cloned()
        .expect("test messages carry an id")
}
