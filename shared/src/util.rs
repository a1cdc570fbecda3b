//! Utility functions

use rand::Rng;

/// Custom epoch: 2024-01-01T00:00:00Z in milliseconds
const EPOCH_MS: i64 = 1_704_067_200_000;

/// Current unix time in milliseconds.
///
/// All timestamp columns store this representation.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a time-ordered unique id.
///
/// Layout: 41 bits of milliseconds since [`EPOCH_MS`] followed by 12
/// random bits. Ids sort by creation time and stay well inside the
/// positive `i64` range.
pub fn snowflake_id() -> i64 {
    let ts = (now_millis() - EPOCH_MS) & 0x1FF_FFFF_FFFF;
    let noise = rand::thread_rng().gen_range(0..0x1000);
    (ts << 12) | noise
}
