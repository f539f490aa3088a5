//! Human-readable formatting of statistics reports.

use crate::metrics::{EndpointReport, StatsReport};
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};

const HEADER: [&str; 10] = [
    "Type", "Name", "Requests", "Fails", "Avg (ms)", "Min (ms)", "Max (ms)", "p50 (ms)", "p95 (ms)",
    "p99 (ms)",
];

/// Format a report as a table.
pub fn format_table(report: &StatsReport) -> String {
    let mut output = String::new();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(HEADER.to_vec());

    for entry in &report.entries {
        table.add_row(endpoint_row(entry, false));
    }
    table.add_row(endpoint_row(&report.total, true));

    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\nDuration: {}  Throughput: {:.1} req/s  Failures: {:.2}%\n",
        format_elapsed(report.duration_secs()),
        report.total.requests_per_second,
        report.total.failure_ratio() * 100.0
    ));

    if !report.errors.is_empty() {
        output.push_str("\nErrors:\n");
        for error in &report.errors {
            output.push_str(&format!(
                "  {} x {} {}: {}\n",
                format_count(error.occurrences),
                error.request_type,
                error.name,
                error.error
            ));
        }
    }

    output
}

fn endpoint_row(entry: &EndpointReport, is_total: bool) -> Vec<Cell> {
    let name = if is_total {
        Cell::new(&entry.name).fg(Color::Cyan)
    } else {
        Cell::new(&entry.name)
    };
    let fails = if entry.num_failures > 0 {
        Cell::new(format_count(entry.num_failures)).fg(Color::Red)
    } else {
        Cell::new("0").fg(Color::Green)
    };

    vec![
        Cell::new(&entry.request_type),
        name,
        Cell::new(format_count(entry.num_requests)),
        fails,
        Cell::new(format_millis(entry.avg_response_time_ms)),
        Cell::new(format_millis(entry.min_response_time_ms)),
        Cell::new(format_millis(entry.max_response_time_ms)),
        Cell::new(format_millis(entry.p50_response_time_ms)),
        Cell::new(format_millis(entry.p95_response_time_ms)),
        Cell::new(format_millis(entry.p99_response_time_ms)),
    ]
}

/// Format a report as markdown.
pub fn format_markdown(report: &StatsReport) -> String {
    let mut output = String::new();

    output.push_str("# Load Test Results\n\n");
    output.push_str(&format!(
        "**Generated at:** {}\n\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    output.push_str("## Summary\n\n");
    output.push_str(&format!(
        "- **Duration:** {}\n",
        format_elapsed(report.duration_secs())
    ));
    output.push_str(&format!(
        "- **Total Requests:** {}\n",
        format_count(report.total.num_requests)
    ));
    output.push_str(&format!(
        "- **Failures:** {}\n",
        format_count(report.total.num_failures)
    ));
    output.push_str(&format!(
        "- **Throughput:** {:.1} req/sec\n\n",
        report.total.requests_per_second
    ));

    output.push_str("## Requests\n\n");
    output.push_str(&format!("| {} |\n", HEADER.join(" | ")));
    output.push_str(&format!("|{}\n", "---|".repeat(HEADER.len())));

    for entry in report.entries.iter().chain(std::iter::once(&report.total)) {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
            entry.request_type,
            entry.name,
            format_count(entry.num_requests),
            format_count(entry.num_failures),
            format_millis(entry.avg_response_time_ms),
            format_millis(entry.min_response_time_ms),
            format_millis(entry.max_response_time_ms),
            format_millis(entry.p50_response_time_ms),
            format_millis(entry.p95_response_time_ms),
            format_millis(entry.p99_response_time_ms),
        ));
    }

    if !report.errors.is_empty() {
        output.push_str("\n## Errors\n\n");
        for error in &report.errors {
            output.push_str(&format!(
                "- **{}** x `{}`\n",
                format_count(error.occurrences),
                error.error
            ));
        }
    }

    output
}

/// Run length: tenths of a second under a minute, whole seconds above.
fn format_elapsed(secs: f64) -> String {
    if secs < 60.0 {
        return format!("{:.1}s", secs.max(0.0));
    }
    let whole = secs.round() as u64;
    let (hours, mins, secs) = (whole / 3600, whole % 3600 / 60, whole % 60);
    if hours > 0 {
        format!("{hours}h {mins:02}m {secs:02}s")
    } else {
        format!("{mins}m {secs:02}s")
    }
}

/// Latency cell: more decimals for sub-10ms values, none past one second.
fn format_millis(ms: f64) -> String {
    if ms < 10.0 {
        format!("{ms:.2}")
    } else if ms < 1000.0 {
        format!("{ms:.1}")
    } else {
        format_count(ms.round() as u64)
    }
}

/// Count with comma-separated thousands.
fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;
    let mut groups: Vec<&str> = Vec::new();
    if head > 0 {
        groups.push(&digits[..head]);
    }
    groups.extend(
        digits.as_bytes()[head..]
            .chunks(3)
            .filter_map(|chunk| std::str::from_utf8(chunk).ok()),
    );
    groups.join(",")
}
