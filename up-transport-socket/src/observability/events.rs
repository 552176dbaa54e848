//! Canonical structured event names used across `up-transport-socket`.

// Transport lifecycle events.
pub const TRANSPORT_CONNECTED: &str = "transport_connected";
pub const TRANSPORT_SHUTDOWN: &str = "transport_shutdown";

// Send-path events.
pub const SEND_ENCODE_FAILED: &str = "send_encode_failed";
pub const SEND_OK: &str = "send_ok";
pub const SEND_FAILED: &str = "send_failed";

// Listener registration events.
pub const LISTENER_REGISTERED: &str = "listener_registered";
pub const LISTENER_REMOVED: &str = "listener_removed";
pub const LISTENER_REMOVE_NOT_FOUND: &str = "listener_remove_not_found";

// Dispatch-loop events.
pub const DISPATCH_DELIVERED: &str = "dispatch_delivered";
pub const DISPATCH_DECODE_FAILED: &str = "dispatch_decode_failed";
pub const DISPATCH_STOPPED: &str = "dispatch_stopped";
