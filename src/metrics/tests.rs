use super::*;
use std::time::Duration;

const EPSILON: f64 = 1e-9;

fn approx_eq(actual: f64, expected: f64) -> Result<(), String> {
    if (actual - expected).abs() < EPSILON {
        Ok(())
    } else {
        Err(format!("expected {}, got {}", expected, actual))
    }
}

fn succeeded(dns_ms: u64, tcp_ms: u64, processing_ms: u64, content_ms: u64) -> RequestOutcome {
    let dns_lookup = Duration::from_millis(dns_ms);
    let tcp_connect = Duration::from_millis(tcp_ms);
    let server_processing = Duration::from_millis(processing_ms);
    let content_transfer = Duration::from_millis(content_ms);
    RequestOutcome {
        dns_lookup,
        tcp_connect,
        server_processing,
        content_transfer,
        total: dns_lookup
            .saturating_add(tcp_connect)
            .saturating_add(server_processing)
            .saturating_add(content_transfer),
        succeeded: true,
    }
}

fn distribution_of(values_ms: &[u64], limit: usize) -> Result<PhaseDistribution, String> {
    let mut distribution = PhaseDistribution::new(limit);
    for value in values_ms {
        distribution
            .record(Duration::from_millis(*value))
            .map_err(|err| err.to_string())?;
    }
    Ok(distribution)
}

#[test]
fn even_sized_set_interpolates_between_middle_ranks() -> Result<(), String> {
    let mut distribution = distribution_of(&[40, 10, 30, 20], 100)?;
    let stats = distribution.summarize();
    approx_eq(stats.median, 25.0)?;
    approx_eq(stats.mean, 25.0)?;
    // rank 0.95 * 3 = 2.85 -> 30 + 0.85 * 10
    approx_eq(stats.p95, 38.5)
}

#[test]
fn odd_sized_set_uses_middle_value() -> Result<(), String> {
    let mut distribution = distribution_of(&[30, 10, 20], 100)?;
    let stats = distribution.summarize();
    approx_eq(stats.median, 20.0)?;
    approx_eq(stats.mean, 20.0)?;
    approx_eq(stats.p95, 29.0)
}

#[test]
fn single_sample_is_every_percentile() -> Result<(), String> {
    let mut distribution = distribution_of(&[7], 100)?;
    let stats = distribution.summarize();
    approx_eq(stats.mean, 7.0)?;
    approx_eq(stats.median, 7.0)?;
    approx_eq(stats.p95, 7.0)
}

#[test]
fn empty_distribution_is_zero() -> Result<(), String> {
    let mut distribution = PhaseDistribution::new(10);
    let stats = distribution.summarize();
    approx_eq(stats.mean, 0.0)?;
    approx_eq(stats.median, 0.0)?;
    approx_eq(stats.p95, 0.0)
}

#[test]
fn distribution_switches_to_histogram_past_limit() -> Result<(), String> {
    let values: Vec<u64> = (1..=1000).collect();
    let mut distribution = distribution_of(&values, 50)?;
    if distribution.is_exact() {
        return Err("Expected histogram mode after exceeding the limit".to_owned());
    }
    if distribution.count() != 1000 {
        return Err(format!("Expected 1000 samples, got {}", distribution.count()));
    }
    // Mean stays exact from the running sum.
    approx_eq(distribution.mean_ms(), 500.5)?;
    let median = distribution.quantile_ms(0.5);
    if (median - 500.0).abs() > 1.0 {
        return Err(format!("Histogram median too far off: {}", median));
    }
    Ok(())
}

#[test]
fn histogram_mode_keeps_millisecond_scale_percentiles() -> Result<(), String> {
    let mut aggregator = StatsAggregator::new(2);
    for processing_ms in [10, 20, 30, 40, 50] {
        aggregator
            .record(&succeeded(1, 2, processing_ms, 4))
            .map_err(|err| err.to_string())?;
    }
    let metrics = aggregator.finish("http://localhost", Duration::from_secs(1));

    let processing = metrics.processing_stats;
    for (label, actual, expected) in [
        ("median", processing.median, 30.0),
        ("p95", processing.p95, 50.0),
    ] {
        if (actual - expected).abs() > 0.1 {
            return Err(format!("{} expected about {}, got {}", label, expected, actual));
        }
    }
    approx_eq(processing.mean, 30.0)?;
    if (metrics.dns_median - 1.0).abs() > 0.01 {
        return Err(format!("DNS median expected about 1, got {}", metrics.dns_median));
    }
    Ok(())
}

#[test]
fn failed_outcomes_count_but_do_not_shape_percentiles() -> Result<(), String> {
    let mut aggregator = StatsAggregator::new(100);
    for outcome in [
        succeeded(1, 2, 10, 4),
        succeeded(1, 2, 20, 4),
        RequestOutcome::failed(Duration::from_millis(5000)),
    ] {
        aggregator.record(&outcome).map_err(|err| err.to_string())?;
    }
    let metrics = aggregator.finish("http://localhost", Duration::from_secs(1));

    if metrics.total_requests != 3 || metrics.failed_requests != 1 {
        return Err(format!(
            "Unexpected counts: total {} failed {}",
            metrics.total_requests, metrics.failed_requests
        ));
    }
    if metrics.succeeded_requests() + metrics.failed_requests != metrics.total_requests {
        return Err("succeeded + failed must equal total".to_owned());
    }
    approx_eq(metrics.processing_stats.median, 15.0)?;
    approx_eq(metrics.tcp_stats.mean, 2.0)?;
    approx_eq(metrics.dns_median, 1.0)
}

#[test]
fn all_failed_run_reports_zeroes() -> Result<(), String> {
    let mut aggregator = StatsAggregator::new(100);
    for _ in 0..4 {
        aggregator
            .record(&RequestOutcome::failed(Duration::from_millis(3)))
            .map_err(|err| err.to_string())?;
    }
    let metrics = aggregator.finish("http://localhost", Duration::from_millis(500));

    if metrics.failed_requests != metrics.total_requests {
        return Err("Expected every request to be failed".to_owned());
    }
    for stats in [
        metrics.tcp_stats,
        metrics.processing_stats,
        metrics.content_stats,
    ] {
        approx_eq(stats.mean, 0.0)?;
        approx_eq(stats.median, 0.0)?;
        approx_eq(stats.p95, 0.0)?;
        if stats.mean.is_nan() || stats.median.is_nan() || stats.p95.is_nan() {
            return Err("Stats must never be NaN".to_owned());
        }
    }
    approx_eq(metrics.dns_median, 0.0)
}

#[test]
fn requests_per_second_uses_elapsed_wall_clock() -> Result<(), String> {
    let mut aggregator = StatsAggregator::new(100);
    for _ in 0..10 {
        aggregator
            .record(&succeeded(0, 0, 1, 1))
            .map_err(|err| err.to_string())?;
    }
    let metrics = aggregator.finish("http://localhost", Duration::from_secs(4));
    approx_eq(metrics.requests_per_second, 2.5)?;
    approx_eq(metrics.elapsed_seconds, 4.0)
}

#[test]
fn zero_elapsed_time_reports_zero_throughput() -> Result<(), String> {
    let aggregator = StatsAggregator::new(100);
    let metrics = aggregator.finish("http://localhost", Duration::ZERO);
    approx_eq(metrics.requests_per_second, 0.0)
}

#[test]
fn result_metrics_json_round_trip_is_lossless() -> Result<(), String> {
    let metrics = ResultMetrics {
        base_url: "https://example.com".to_owned(),
        total_requests: 1234,
        failed_requests: 7,
        requests_per_second: 1234.0 / 3.0,
        dns_median: 1.0 / 7.0,
        tcp_stats: PhaseStats {
            mean: 1.125,
            median: 1.0625,
            p95: std::f64::consts::E,
        },
        processing_stats: PhaseStats {
            mean: 12.5,
            median: 11.0,
            p95: 10.0 / 3.0 * 9.0,
        },
        content_stats: PhaseStats {
            mean: 0.125,
            median: 0.25,
            p95: 2.0 / 3.0,
        },
        elapsed_seconds: 3.0 + 1.0 / 1_000_000_000.0,
    };
    let json = serde_json::to_string(&metrics).map_err(|err| err.to_string())?;
    if !json.contains("\"95th_percentile\"") || !json.contains("\"tcp_connect\"") {
        return Err(format!("Unexpected field names: {}", json));
    }
    let decoded: ResultMetrics = serde_json::from_str(&json).map_err(|err| err.to_string())?;
    if decoded != metrics {
        return Err(format!("Round trip changed values: {:?}", decoded));
    }
    Ok(())
}

#[tokio::test]
async fn aggregator_task_drains_every_sender() -> Result<(), String> {
    let (outcome_tx, outcome_rx) = tokio::sync::mpsc::channel(4);
    let handle = spawn_aggregator(outcome_rx, 100);

    let mut producers = Vec::new();
    for _ in 0..8 {
        let outcome_tx = outcome_tx.clone();
        producers.push(tokio::spawn(async move {
            for _ in 0..25 {
                if outcome_tx.send(succeeded(0, 1, 2, 3)).await.is_err() {
                    return;
                }
            }
        }));
    }
    drop(outcome_tx);
    for producer in producers {
        producer.await.map_err(|err| err.to_string())?;
    }

    let aggregator = handle
        .await
        .map_err(|err| err.to_string())?
        .map_err(|err| err.to_string())?;
    if aggregator.total_requests() != 200 {
        return Err(format!(
            "Expected 200 outcomes, got {}",
            aggregator.total_requests()
        ));
    }
    Ok(())
}
