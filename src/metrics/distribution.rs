use std::time::Duration;

use hdrhistogram::Histogram;

use crate::error::MetricsError;

use super::PhaseStats;

const NANOS_PER_MILLI: f64 = 1_000_000.0;
const HISTOGRAM_SIGFIG: u8 = 3;

/// Samples of one request phase.
///
/// Values are kept exactly until `limit` samples are held; past that every
/// sample is folded into an HDR histogram so memory stops growing with the
/// request count. The running sum stays exact either way.
#[derive(Debug)]
pub struct PhaseDistribution {
    samples: Vec<u64>,
    histogram: Option<Histogram<u64>>,
    limit: usize,
    count: u64,
    sum_nanos: u128,
}

impl PhaseDistribution {
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            samples: Vec::new(),
            histogram: None,
            limit,
            count: 0,
            sum_nanos: 0,
        }
    }

    /// Record one phase duration.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created when the exact
    /// sample limit is first exceeded, or if it rejects a sample.
    pub fn record(&mut self, value: Duration) -> Result<(), MetricsError> {
        let nanos = u64::try_from(value.as_nanos()).unwrap_or(u64::MAX);
        self.count = self.count.saturating_add(1);
        self.sum_nanos = self.sum_nanos.saturating_add(u128::from(nanos));

        if let Some(histogram) = self.histogram.as_mut() {
            return record_sample(histogram, nanos);
        }

        self.samples.push(nanos);
        if self.samples.len() > self.limit {
            self.spill()?;
        }
        Ok(())
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    pub const fn is_exact(&self) -> bool {
        self.histogram.is_none()
    }

    /// Arithmetic mean in milliseconds, 0 when empty.
    #[must_use]
    pub fn mean_ms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum_nanos as f64 / self.count as f64 / NANOS_PER_MILLI
    }

    /// Percentile in milliseconds for `quantile` in `[0, 1]`, 0 when empty.
    ///
    /// Exact samples use linear interpolation between the two ranks that
    /// bracket `quantile * (n - 1)`.
    pub fn quantile_ms(&mut self, quantile: f64) -> f64 {
        let quantile = quantile.clamp(0.0, 1.0);
        if let Some(histogram) = self.histogram.as_ref() {
            if histogram.len() == 0 {
                return 0.0;
            }
            return histogram.value_at_quantile(quantile) as f64 / NANOS_PER_MILLI;
        }
        self.samples.sort_unstable();
        interpolate(&self.samples, quantile) / NANOS_PER_MILLI
    }

    #[must_use]
    pub fn summarize(&mut self) -> PhaseStats {
        PhaseStats {
            mean: self.mean_ms(),
            median: self.quantile_ms(0.5),
            p95: self.quantile_ms(0.95),
        }
    }

    fn spill(&mut self) -> Result<(), MetricsError> {
        let mut histogram =
            Histogram::<u64>::new(HISTOGRAM_SIGFIG).map_err(|err| MetricsError::Histogram {
                context: "create",
                source: Box::new(err),
            })?;
        for value in self.samples.drain(..) {
            record_sample(&mut histogram, value)?;
        }
        self.samples.shrink_to_fit();
        tracing::debug!(
            "Exact sample limit {} exceeded; switching to histogram percentiles.",
            self.limit
        );
        self.histogram = Some(histogram);
        Ok(())
    }
}

fn record_sample(histogram: &mut Histogram<u64>, nanos: u64) -> Result<(), MetricsError> {
    histogram
        .record(nanos)
        .map_err(|err| MetricsError::Histogram {
            context: "record",
            source: Box::new(err),
        })
}

/// Linear interpolation over an ascending slice; 0 when empty.
fn interpolate(sorted: &[u64], quantile: f64) -> f64 {
    let Some(last_index) = sorted.len().checked_sub(1) else {
        return 0.0;
    };
    let rank = quantile * last_index as f64;
    let lower_index = rank.floor() as usize;
    let upper_index = rank.ceil() as usize;
    let lower = sorted.get(lower_index).copied().unwrap_or(0) as f64;
    let upper = sorted.get(upper_index).copied().unwrap_or(0) as f64;
    lower + (upper - lower) * (rank - lower_index as f64)
}
