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

//! Concurrent pattern-to-listeners registry with per-entry locking.

use crate::routing::uri_pattern_key::UriPatternKey;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use up_rust::{ComparableListener, UMessage, UUri};

/// Listener set registered under one exact pattern key.
///
/// The set has its own lock so dispatch against this pattern only contends
/// with registration and removal on this same pattern, never with traffic on
/// unrelated patterns.
pub(crate) struct PatternEntry {
    listeners: Mutex<HashSet<ComparableListener>>,
    // Recorded at entry creation, not consulted by matching. A composite
    // (source, sink) matching rule would start here.
    sink_refinement: Option<UUri>,
}

impl PatternEntry {
    fn new(sink_refinement: Option<UUri>) -> Self {
        Self {
            listeners: Mutex::new(HashSet::new()),
            sink_refinement,
        }
    }

    /// Adds a listener handle; returns false when the identical handle was
    /// already registered (set semantics, identity-compared).
    pub(crate) async fn insert(&self, listener: ComparableListener) -> bool {
        self.listeners.lock().await.insert(listener)
    }

    /// Removes a listener handle; returns whether anything was removed.
    pub(crate) async fn remove(&self, listener: &ComparableListener) -> bool {
        self.listeners.lock().await.remove(listener)
    }

    /// Invokes every currently-registered listener sequentially with a clone
    /// of `message`, holding the entry lock for the duration.
    pub(crate) async fn invoke_all(&self, message: &UMessage) -> usize {
        let listeners = self.listeners.lock().await;
        for listener in listeners.iter() {
            listener.on_receive(message.clone()).await;
        }
        listeners.len()
    }

    pub(crate) fn sink_refinement(&self) -> Option<&UUri> {
        self.sink_refinement.as_ref()
    }
}

/// Map from pattern key to its entry.
///
/// Locking discipline: the map lock guards only lookup, insert, and handle
/// cloning. It is never held while an entry lock is taken, so no lock-order
/// cycle exists between the map and any entry.
pub(crate) struct ListenerRegistry {
    entries: Mutex<HashMap<UriPatternKey, Arc<PatternEntry>>>,
}

impl ListenerRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the entry for `key`, creating an empty one under the map lock
    /// if absent. Two concurrent first-registrations for the same key observe
    /// the same entry object. The refinement is recorded only by whichever
    /// caller creates the entry.
    pub(crate) async fn find_or_create(
        &self,
        key: UriPatternKey,
        sink_refinement: Option<UUri>,
    ) -> Arc<PatternEntry> {
        let mut entries = self.entries.lock().await;
        entries
            .entry(key)
            .or_insert_with(|| Arc::new(PatternEntry::new(sink_refinement)))
            .clone()
    }

    /// Non-creating lookup, used by dispatch.
    pub(crate) async fn find(&self, key: &UriPatternKey) -> Option<Arc<PatternEntry>> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Sweeps every entry and removes the handles matching `predicate` under
    /// each entry's own lock; returns how many handles were removed. Emptied
    /// entries stay in the map so a registration racing the sweep still lands
    /// in a reachable entry.
    pub(crate) async fn erase_matching<P>(&self, predicate: P) -> usize
    where
        P: Fn(&ComparableListener) -> bool,
    {
        let entries: Vec<Arc<PatternEntry>> =
            self.entries.lock().await.values().cloned().collect();

        let mut removed = 0;
        for entry in entries {
            let mut listeners = entry.listeners.lock().await;
            let before = listeners.len();
            listeners.retain(|listener| !predicate(listener));
            removed += before - listeners.len();
        }
        removed
    }
}
