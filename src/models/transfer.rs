//! Transfer result data model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The outcome of one download or upload sample.
///
/// Produced fresh by each transfer operation and consumed immediately by
/// the unit converter; never retained across samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResult {
    /// When the transfer began
    pub start: DateTime<Utc>,

    /// When the last byte was confirmed
    pub finish: DateTime<Utc>,

    /// Bytes moved over the connection
    pub bytes: u64,
}

impl TransferResult {
    pub fn new(start: DateTime<Utc>, finish: DateTime<Utc>, bytes: u64) -> Self {
        Self { start, finish, bytes }
    }

    /// Signed elapsed interval between start and finish.
    ///
    /// Can be zero or negative when the clock resolution is coarser than
    /// the transfer, which the unit converter rejects explicitly.
    pub fn elapsed(&self) -> Duration {
        self.finish - self.start
    }

    /// Throughput of this transfer in megabits per second
    pub fn mbps(&self) -> crate::error::Result<f64> {
        crate::units::calc_mbps(self.start, self.finish, self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_elapsed() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let finish = start + Duration::milliseconds(1500);
        let res = TransferResult::new(start, finish, 1000);
        assert_eq!(res.elapsed(), Duration::milliseconds(1500));
    }

    #[test]
    fn test_elapsed_can_be_zero() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let res = TransferResult::new(at, at, 1000);
        assert_eq!(res.elapsed(), Duration::zero());
        assert!(res.mbps().is_err());
    }
}
