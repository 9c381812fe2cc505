//! Bandwidth unit conversion
//!
//! Converts a byte count and a pair of timestamps into megabits per
//! second using the fixed convention 1 megabit = 125,000 bytes.

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};

/// Bytes per megabit (bytes × 8 bits ÷ 1,000,000)
pub const BYTES_PER_MEGABIT: f64 = 125_000.0;

/// Compute throughput in megabits per second for a transfer.
///
/// Elapsed time is derived from the nanosecond-precision timestamps. A
/// zero or negative interval cannot yield a meaningful rate and is
/// rejected with [`AppError::Timing`] rather than dividing by zero.
pub fn calc_mbps(start: DateTime<Utc>, finish: DateTime<Utc>, bytes: u64) -> Result<f64> {
    let elapsed = finish - start;
    let nanos = elapsed.num_nanoseconds().ok_or_else(|| {
        AppError::timing(format!("Elapsed interval overflows nanoseconds: {}", elapsed))
    })?;

    if nanos <= 0 {
        return Err(AppError::timing(format!(
            "Non-positive elapsed interval ({} ns) for {} byte transfer",
            nanos, bytes
        )));
    }

    let secs = nanos as f64 / 1_000_000_000.0;
    let megabits = bytes as f64 / BYTES_PER_MEGABIT;
    Ok(megabits / secs)
}
