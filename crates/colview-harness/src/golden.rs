#![forbid(unsafe_code)]

//! Deterministic layout checksums for golden comparisons.
//!
//! A checksum covers the whole [`HeaderSnapshot`]: order, offsets, widths,
//! visibility, z-order, sort indicators and drag state. Two views that
//! render identically hash identically.
//!
//! When a golden checksum changes, record alongside the update what changed
//! and which layout rules still hold.

use colview::HeaderSnapshot;

/// Prefix for clarity in logs.
pub const CHECKSUM_PREFIX: &str = "blake3:";

/// Canonical JSON rendering of a snapshot.
#[must_use]
pub fn snapshot_json(snapshot: &HeaderSnapshot) -> String {
    serde_json::to_string(snapshot).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
}

/// blake3 digest of [`snapshot_json`], hex-encoded and prefixed.
#[must_use]
pub fn layout_checksum(snapshot: &HeaderSnapshot) -> String {
    let digest = blake3::hash(snapshot_json(snapshot).as_bytes());
    tracing::debug!(columns = snapshot.columns.len(), %digest, "layout checksum");
    format!("{CHECKSUM_PREFIX}{}", digest.to_hex())
}
