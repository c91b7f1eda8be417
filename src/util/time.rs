use std::time::{SystemTime, UNIX_EPOCH};

/// Whole seconds since the UNIX epoch, as used in exported file names
pub fn timestamp_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
