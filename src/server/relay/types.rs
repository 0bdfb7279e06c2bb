use uuid::Uuid;

/// Opaque transport-assigned connection identifier. Valid only for the
/// lifetime of one live connection and never reused after disconnect.
pub type ConnId = Uuid;

/// Board state as submitted by a client. Relayed verbatim, never inspected.
pub type Grid = serde_json::Value;
