//! Round-trip latency probing

use crate::error::{AppError, Result};
use crate::protocol::TestConnection;
use std::time::Duration;

/// Measure mean round-trip latency over `probes` sequential exchanges.
///
/// The mean is a truncated integer division in nanoseconds; the
/// fractional remainder is discarded. A probe failure propagates
/// immediately with no retry.
pub async fn measure_rtt(conn: &mut dyn TestConnection, probes: u32) -> Result<Duration> {
    if probes == 0 {
        return Err(AppError::config("Probe count must be at least 1"));
    }

    let mut total_nanos: u128 = 0;
    for _ in 0..probes {
        let rtt = conn.ping().await?;
        total_nanos += rtt.as_nanos();
    }

    let mean = total_nanos / u128::from(probes);
    Ok(Duration::from_nanos(mean as u64))
}
