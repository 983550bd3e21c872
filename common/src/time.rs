// A simple module to define the time types used by chat transactions
//
// Client timestamps are expressed in seconds since the chain epoch
// (see `config::EPOCH_UNIX_SECONDS`), not since the UNIX epoch.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::EPOCH_UNIX_SECONDS;

// Seconds since the chain epoch
pub type EpochSeconds = u32;

#[inline]
pub fn get_current_time() -> Duration {
    // A clock set before 1970 is treated as the UNIX epoch itself
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

// Return the current time in seconds since the chain epoch
// Saturates at zero for clocks set before the chain epoch
pub fn get_epoch_time() -> EpochSeconds {
    to_epoch_time(get_current_time().as_secs())
}

// Convert UNIX seconds into chain epoch seconds
pub fn to_epoch_time(unix_seconds: u64) -> EpochSeconds {
    unix_seconds
        .saturating_sub(EPOCH_UNIX_SECONDS)
        .min(EpochSeconds::MAX as u64) as EpochSeconds
}
