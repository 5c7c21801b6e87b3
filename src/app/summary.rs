use std::fmt::{self, Write as _};

use crate::error::{AppError, AppResult, SinkError};
use crate::metrics::{PhaseStats, ResultMetrics};

const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

struct Painter {
    color: bool,
}

impl Painter {
    fn paint(&self, value: &str) -> String {
        if self.color {
            format!("{}{}{}", CYAN, value, RESET)
        } else {
            value.to_owned()
        }
    }

    fn ms(&self, value: f64) -> String {
        self.paint(&format!("{:.2}", value))
    }
}

fn phase_line(
    output: &mut String,
    label: &str,
    stats: &PhaseStats,
    painter: &Painter,
) -> fmt::Result {
    writeln!(
        output,
        " {:.<32}: Avg/mean={}ms\tMedian={}ms\tp(95)={}ms",
        label,
        painter.ms(stats.mean),
        painter.ms(stats.median),
        painter.ms(stats.p95)
    )
}

fn total_line(output: &mut String, label: &str, value: &str) -> fmt::Result {
    writeln!(output, " {:.<32}: {}", label, value)
}

/// The end-of-run table: per-phase latencies, then request totals.
pub(crate) fn render_summary(metrics: &ResultMetrics, color: bool) -> Result<String, fmt::Error> {
    let painter = Painter { color };
    let mut output = String::new();
    output.push('\n');
    phase_line(&mut output, "TCP Connect", &metrics.tcp_stats, &painter)?;
    phase_line(
        &mut output,
        "Server Processing",
        &metrics.processing_stats,
        &painter,
    )?;
    phase_line(
        &mut output,
        "Content Transfer",
        &metrics.content_stats,
        &painter,
    )?;
    output.push_str("\nSummary:\n");
    total_line(
        &mut output,
        "Total Req.",
        &painter.paint(&metrics.total_requests.to_string()),
    )?;
    total_line(
        &mut output,
        "Failed Req.",
        &painter.paint(&metrics.failed_requests.to_string()),
    )?;
    total_line(
        &mut output,
        "DNS Lookup",
        &format!("{}ms", painter.ms(metrics.dns_median)),
    )?;
    total_line(
        &mut output,
        "Req/s",
        &painter.paint(&format!("{:.2}", metrics.requests_per_second)),
    )?;
    Ok(output)
}

/// Prints the summary table to stdout.
///
/// # Errors
///
/// Returns an error when the table cannot be formatted.
pub(crate) fn print_summary(metrics: &ResultMetrics, color: bool) -> AppResult<()> {
    let table = render_summary(metrics, color)
        .map_err(|err| AppError::sink(SinkError::WriteLine { source: err }))?;
    println!("{}", table);
    Ok(())
}
