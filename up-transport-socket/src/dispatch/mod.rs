//! Dispatch layer: the background loop that reads frames and fans decoded
//! messages out to matching listeners.

pub(crate) mod inbound_dispatcher;
