//! Adaptive sustained-duration throughput sampling
//!
//! One loop serves both directions. Each iteration transfers the current
//! size, converts the sample to Mbps, then checks whether that transfer's
//! own elapsed time exceeded the sustain threshold. Until it does, the
//! next transfer grows by a fixed additive step of `growth × seed` bytes.
//! There is no upper bound on size or elapsed time beyond the threshold
//! check, and no timeout at this level; bounding a stalled transfer is
//! the connection layer's job.

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::observer::TestObserver;
use crate::protocol::TestConnection;
use crate::types::Direction;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters for one adaptive sampling run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Initial transfer size in bytes (must be > 0)
    pub seed_bytes: u64,

    /// Wall-clock duration a single transfer must exceed to stop the run
    pub sustain: Duration,

    /// Additive growth factor applied per step
    pub growth_multiplier: u64,
}

impl SamplerConfig {
    pub fn new(seed_bytes: u64, sustain: Duration, growth_multiplier: u64) -> Self {
        Self {
            seed_bytes,
            sustain,
            growth_multiplier,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.seed_bytes == 0 {
            return Err(AppError::config("Seed size must be greater than 0 bytes"));
        }
        if self.growth_multiplier == 0 {
            return Err(AppError::config("Growth multiplier must be greater than 0"));
        }
        Ok(())
    }
}

impl From<&Config> for SamplerConfig {
    fn from(config: &Config) -> Self {
        Self {
            seed_bytes: config.seed_bytes,
            sustain: config.sustain_threshold(),
            growth_multiplier: config.growth_multiplier,
        }
    }
}

/// Outcome of one adaptive sampling run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThroughputSummary {
    /// Direction the run measured
    pub direction: Direction,

    /// Arithmetic mean throughput across the samples taken
    pub mean_mbps: f64,

    /// Samples included in the mean
    pub samples: u32,

    /// Degenerate samples excluded from the mean
    pub excluded: u32,

    /// Size of the final (sustained) transfer in bytes
    pub final_bytes: u64,
}

/// Run adaptive throughput sampling in one direction.
///
/// The loop body always executes at least once; if the very first
/// transfer already exceeds the threshold, its single sample is the
/// result. A transfer failure aborts the run and discards any partial
/// accumulation. A sample whose elapsed interval is degenerate is
/// reported through the observer and excluded from the mean; the run
/// fails only if every sample was degenerate.
pub async fn run(
    conn: &mut dyn TestConnection,
    direction: Direction,
    config: &SamplerConfig,
    observer: &dyn TestObserver,
) -> Result<ThroughputSummary> {
    config.validate()?;

    let threshold = chrono::Duration::from_std(config.sustain)
        .map_err(|e| AppError::config(format!("Sustain duration out of range: {}", e)))?;

    let mut size = config.seed_bytes;
    let mut acc = 0.0f64;
    let mut samples = 0u32;
    let mut excluded = 0u32;

    loop {
        let res = match direction {
            Direction::Download => conn.download(size).await?,
            Direction::Upload => conn.upload(size).await?,
        };
        let elapsed = res.elapsed();

        match res.mbps() {
            Ok(mbps) => {
                acc += mbps;
                samples += 1;
                observer.on_sample(
                    direction,
                    size,
                    elapsed.to_std().unwrap_or(Duration::ZERO),
                    mbps,
                );
            }
            Err(err @ AppError::Timing(_)) => {
                excluded += 1;
                observer.on_sample_excluded(direction, size, &err);
            }
            Err(err) => return Err(err),
        }

        if elapsed > threshold {
            break;
        }
        size += config.growth_multiplier * config.seed_bytes;
    }

    if samples == 0 {
        return Err(AppError::timing(format!(
            "All {} {} samples had degenerate timing",
            excluded, direction
        )));
    }

    let mean_mbps = acc / f64::from(samples);
    observer.on_run_complete(direction, samples, mean_mbps);

    Ok(ThroughputSummary {
        direction,
        mean_mbps,
        samples,
        excluded,
        final_bytes: size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransferResult;
    use crate::observer::NullObserver;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    /// Connection stub that fabricates transfer timestamps from a script
    /// of per-call durations, recording the sizes it was asked for.
    struct ScriptedTransfers {
        durations_ms: Vec<i64>,
        calls: usize,
        sizes_seen: Vec<u64>,
        fail_on_call: Option<usize>,
    }

    impl ScriptedTransfers {
        fn new(durations_ms: Vec<i64>) -> Self {
            Self {
                durations_ms,
                calls: 0,
                sizes_seen: Vec::new(),
                fail_on_call: None,
            }
        }

        fn failing_on(mut self, call: usize) -> Self {
            self.fail_on_call = Some(call);
            self
        }

        fn transfer(&mut self, bytes: u64) -> Result<TransferResult> {
            if self.fail_on_call == Some(self.calls) {
                return Err(AppError::connection("reset mid-transfer"));
            }
            let ms = self.durations_ms[self.calls.min(self.durations_ms.len() - 1)];
            self.calls += 1;
            self.sizes_seen.push(bytes);

            let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
            Ok(TransferResult::new(
                start,
                start + chrono::Duration::milliseconds(ms),
                bytes,
            ))
        }
    }

    #[async_trait]
    impl TestConnection for ScriptedTransfers {
        async fn ping(&mut self) -> Result<Duration> {
            unreachable!("sampler tests never ping")
        }

        async fn download(&mut self, bytes: u64) -> Result<TransferResult> {
            self.transfer(bytes)
        }

        async fn upload(&mut self, bytes: u64) -> Result<TransferResult> {
            self.transfer(bytes)
        }
    }

    fn config(seed: u64, sustain_secs: u64, growth: u64) -> SamplerConfig {
        SamplerConfig::new(seed, Duration::from_secs(sustain_secs), growth)
    }

    #[tokio::test]
    async fn test_first_sample_over_threshold_is_the_only_sample() {
        // 2s transfer against a 1s threshold terminates immediately
        let mut conn = ScriptedTransfers::new(vec![2_000]);
        let summary = run(&mut conn, Direction::Download, &config(1000, 1, 7), &NullObserver)
            .await
            .unwrap();

        assert_eq!(summary.samples, 1);
        assert_eq!(conn.sizes_seen, vec![1000]);
        // 1000 bytes in 2s: (1000 / 125000) / 2 Mbps
        let expected = (1000.0 / 125_000.0) / 2.0;
        assert!((summary.mean_mbps - expected).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_size_sequence_grows_by_seven_seeds() {
        // Three fast transfers then a sustained one
        let mut conn = ScriptedTransfers::new(vec![100, 100, 100, 2_000]);
        let summary = run(&mut conn, Direction::Download, &config(1000, 1, 7), &NullObserver)
            .await
            .unwrap();

        assert_eq!(conn.sizes_seen, vec![1000, 8000, 15000, 22000]);
        assert_eq!(summary.samples, 4);
        assert_eq!(summary.final_bytes, 22000);
    }

    #[tokio::test]
    async fn test_mean_over_all_samples_taken() {
        let mut conn = ScriptedTransfers::new(vec![1_000, 1_000, 2_000]);
        let summary = run(&mut conn, Direction::Upload, &config(125_000, 1, 7), &NullObserver)
            .await
            .unwrap();

        // Sample rates: 125000B/1s = 1 Mbps, 1.0e6B/1s = 8 Mbps,
        // 1.875e6B/2s = 7.5 Mbps; mean = 5.5
        assert_eq!(summary.samples, 3);
        assert!((summary.mean_mbps - 5.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_upload_direction_uses_upload_op() {
        let mut conn = ScriptedTransfers::new(vec![2_000]);
        let summary = run(&mut conn, Direction::Upload, &config(500, 1, 7), &NullObserver)
            .await
            .unwrap();
        assert_eq!(summary.direction, Direction::Upload);
        assert_eq!(conn.sizes_seen, vec![500]);
    }

    #[tokio::test]
    async fn test_transfer_failure_aborts_run() {
        let mut conn = ScriptedTransfers::new(vec![100, 100, 2_000]).failing_on(1);
        let err = run(&mut conn, Direction::Download, &config(1000, 1, 7), &NullObserver)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Connection(_)));
    }

    #[tokio::test]
    async fn test_degenerate_sample_excluded_from_mean() {
        // Zero-duration first sample, then a valid sustained one
        let mut conn = ScriptedTransfers::new(vec![0, 2_000]);
        let summary = run(&mut conn, Direction::Download, &config(125_000, 1, 7), &NullObserver)
            .await
            .unwrap();

        assert_eq!(summary.samples, 1);
        assert_eq!(summary.excluded, 1);
        // Second transfer: 1.0e6 bytes in 2s = 4 Mbps
        assert!((summary.mean_mbps - 4.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_negative_elapsed_excluded_and_loop_continues() {
        // Clock skew can make finish precede start; the sample is
        // excluded and the run keeps going until a sustained transfer.
        let mut conn = ScriptedTransfers::new(vec![-5, 100, 2_000]);
        let summary = run(&mut conn, Direction::Upload, &config(1000, 1, 7), &NullObserver)
            .await
            .unwrap();

        assert_eq!(summary.excluded, 1);
        assert_eq!(summary.samples, 2);
        assert_eq!(conn.sizes_seen, vec![1000, 8000, 15000]);
    }

    #[tokio::test]
    async fn test_zero_seed_rejected() {
        let mut conn = ScriptedTransfers::new(vec![2_000]);
        let err = run(&mut conn, Direction::Download, &config(0, 1, 7), &NullObserver)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_growth_multiplier_is_configurable() {
        let mut conn = ScriptedTransfers::new(vec![100, 100, 2_000]);
        run(&mut conn, Direction::Download, &config(1000, 1, 2), &NullObserver)
            .await
            .unwrap();
        assert_eq!(conn.sizes_seen, vec![1000, 3000, 5000]);
    }
}
