//! Wire layer: length-prefix framing and the connected dispatcher socket.

pub(crate) mod connection;
pub(crate) mod frame_codec;
