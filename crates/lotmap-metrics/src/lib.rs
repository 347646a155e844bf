//! Latency tracking for map workloads.
//!
//! Each worker thread records into its own [`LatencyHistogram`]; the driver
//! merges them once the workload has joined. Timestamps come from a
//! [`Clock`] backed by the TSC where available.

use core::fmt;

use hdrhistogram::errors::{AdditionError, CreationError};
use hdrhistogram::Histogram;

/// Significant figures used by [`LatencyHistogram::new`].
pub const DEFAULT_SIGFIG: u8 = 3;

/// Nanosecond latency histogram.
#[derive(Clone)]
pub struct LatencyHistogram {
    histogram: Histogram<u64>,
}

impl LatencyHistogram {
    /// Create a histogram with [`DEFAULT_SIGFIG`] significant figures.
    pub fn new() -> Self {
        Self::with_precision(DEFAULT_SIGFIG).expect("3 significant figures is always valid")
    }

    /// Create with custom precision (0-5 significant figures).
    pub fn with_precision(sigfig: u8) -> Result<Self, CreationError> {
        Ok(Self {
            histogram: Histogram::new(sigfig)?,
        })
    }

    /// Record a latency in nanoseconds. The histogram grows to fit.
    #[inline(always)]
    pub fn record(&mut self, nanos: u64) {
        let _ = self.histogram.record(nanos);
    }

    /// Fold another histogram's samples into this one.
    pub fn merge(&mut self, other: &LatencyHistogram) -> Result<(), AdditionError> {
        self.histogram.add(&other.histogram)
    }

    /// Value at percentile (0.0 - 100.0).
    pub fn value_at_percentile(&self, percentile: f64) -> u64 {
        self.histogram.value_at_quantile(percentile / 100.0)
    }

    /// Total recorded samples.
    pub fn count(&self) -> u64 {
        self.histogram.len()
    }

    pub fn max(&self) -> u64 {
        self.histogram.max()
    }

    pub fn mean(&self) -> f64 {
        self.histogram.mean()
    }

    /// Percentile summary for reporting.
    pub fn summary(&self) -> LatencySummary {
        LatencySummary {
            count: self.count(),
            p50: self.value_at_percentile(50.0),
            p90: self.value_at_percentile(90.0),
            p99: self.value_at_percentile(99.0),
            p999: self.value_at_percentile(99.9),
            max: self.max(),
            mean: self.mean(),
        }
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LatencyHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LatencyHistogram")
            .field("count", &self.count())
            .field("max", &self.max())
            .finish()
    }
}

/// Fixed set of percentiles taken from a [`LatencyHistogram`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatencySummary {
    pub count: u64,
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
    pub p999: u64,
    pub max: u64,
    pub mean: f64,
}

impl fmt::Display for LatencySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} p50={} p90={} p99={} p99.9={} max={}",
            self.count,
            format_latency(self.p50),
            format_latency(self.p90),
            format_latency(self.p99),
            format_latency(self.p999),
            format_latency(self.max),
        )
    }
}

/// Format nanoseconds with appropriate units.
pub fn format_latency(nanos: u64) -> String {
    if nanos < 1_000 {
        format!("{} ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.2} μs", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2} ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2} s", nanos as f64 / 1_000_000_000.0)
    }
}

/// Low-overhead monotonic clock.
#[derive(Clone, Debug)]
pub struct Clock {
    clock: quanta::Clock,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            clock: quanta::Clock::new(),
        }
    }

    /// Raw timestamp, only meaningful to [`Clock::delta_as_nanos`].
    #[inline(always)]
    pub fn now(&self) -> u64 {
        self.clock.raw()
    }

    /// Convert two raw timestamps into elapsed nanoseconds.
    #[inline(always)]
    pub fn delta_as_nanos(&self, start: u64, end: u64) -> u64 {
        self.clock.delta_as_nanos(start, end)
    }

    /// Nanoseconds since `start`.
    #[inline(always)]
    pub fn elapsed_nanos(&self, start: u64) -> u64 {
        self.delta_as_nanos(start, self.now())
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_basic() {
        let mut h = LatencyHistogram::new();

        for i in 1..=100 {
            h.record(i * 100);
        }

        let s = h.summary();
        assert_eq!(s.count, 100);
        assert!(s.p50 >= 4900 && s.p50 <= 5100);
        // HdrHistogram may round max value slightly
        assert!(s.max >= 10000 && s.max <= 10100);
    }

    #[test]
    fn test_merge() {
        let mut a = LatencyHistogram::new();
        let mut b = LatencyHistogram::new();
        a.record(100);
        b.record(200);
        b.record(300);

        a.merge(&b).unwrap();
        assert_eq!(a.count(), 3);
        assert_eq!(b.count(), 2);
    }

    #[test]
    fn test_records_beyond_initial_range() {
        let mut h = LatencyHistogram::new();
        h.record(100);
        h.record(250_000);
        h.record(5_000_000_000);

        let s = h.summary();
        assert_eq!(s.count, 3);
        assert!(s.p50 >= 249_000 && s.p50 <= 251_000);
        assert!(s.max >= 4_990_000_000 && s.max <= 5_010_000_000);
    }

    #[test]
    fn test_merge_keeps_large_samples() {
        let mut a = LatencyHistogram::new();
        let mut b = LatencyHistogram::new();
        a.record(1_000);
        b.record(2_000_000);

        a.merge(&b).unwrap();
        assert!(a.max() >= 1_990_000);
    }

    #[test]
    fn test_invalid_precision() {
        assert!(LatencyHistogram::with_precision(6).is_err());
    }

    #[test]
    fn test_format_latency() {
        assert_eq!(format_latency(500), "500 ns");
        assert_eq!(format_latency(5000), "5.00 μs");
        assert_eq!(format_latency(5_000_000), "5.00 ms");
        assert_eq!(format_latency(5_000_000_000), "5.00 s");
    }

    #[test]
    fn test_clock_monotonic() {
        let clock = Clock::new();
        let start = clock.now();
        let end = clock.now();
        assert!(clock.delta_as_nanos(start, end) < 1_000_000_000);
        let _ = clock.elapsed_nanos(start);
    }
}
