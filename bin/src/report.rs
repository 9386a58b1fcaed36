//! Text rendering for analysis reports.

use aerovia_stats::{AggregateBucket, AnalysisReport};

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Print a full analysis report in text form.
pub fn print_report(report: &AnalysisReport) {
    println!("{}", DIVIDER);
    println!("SUMMARY");
    println!("{}\n", DIVIDER);

    let summary = &report.summary;
    println!("Days analyzed: {}", summary.total_days);
    if let (Some(start), Some(end)) = (summary.start, summary.end) {
        println!("Date range:    {} to {}", start, end);
    }
    println!();

    if !summary.aqi_stats.is_empty() {
        println!(
            "{:<18} {:>10} {:>10} {:>10} {:>10} {:>10}",
            "Column", "Mean", "Median", "Std", "Min", "Max"
        );
        println!("{}", "─".repeat(73));
        for col in summary.aqi_stats.iter().chain(summary.transport_stats.iter()) {
            println!(
                "{:<18} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
                col.column, col.mean, col.median, col.std, col.min, col.max
            );
        }
        println!();
    }

    if !summary.category_distribution.is_empty() {
        println!("AQI category distribution:");
        for (label, count) in &summary.category_distribution {
            println!("  {:<32} {:>5} days", label, count);
        }
        println!();
    }

    println!("{}", DIVIDER);
    println!("CORRELATIONS (air-quality metric × transport metric)");
    println!("{}\n", DIVIDER);

    println!(
        "{:<10} {:<18} {:>10} {:>10} {:>6}  {}",
        "Metric", "vs", "r", "p-value", "n", "sig"
    );
    println!("{}", "─".repeat(64));
    for result in &report.correlations {
        let coefficient = result
            .coefficient
            .map_or_else(|| format!("{:>10}", "undefined"), |r| format!("{:>10.4}", r));
        println!(
            "{:<10} {:<18} {} {:>10.4} {:>6}  {}",
            result.metric_a,
            result.metric_b,
            coefficient,
            result.p_value,
            result.n_obs,
            if result.significant { "*" } else { "" }
        );
    }
    println!();
    println!("* significant at the engine's two-tailed level");
    println!();

    println!("{}", DIVIDER);
    println!("RIDERSHIP BY WEEKDAY");
    println!("{}\n", DIVIDER);
    print_buckets(&report.aggregates.by_weekday);

    println!("{}", DIVIDER);
    println!("RIDERSHIP BY AQI CATEGORY");
    println!("{}\n", DIVIDER);
    print_buckets(&report.aggregates.by_category);
}

fn print_buckets(buckets: &[AggregateBucket]) {
    if buckets.is_empty() {
        println!("(no rows in the filtered range)\n");
        return;
    }

    println!(
        "{:<32} {:<18} {:>12} {:>12} {:>6}",
        "Bucket", "Metric", "Mean", "Median", "Days"
    );
    println!("{}", "─".repeat(85));
    for bucket in buckets {
        for (i, metric) in bucket.metrics.iter().enumerate() {
            let key = if i == 0 { bucket.key.as_str() } else { "" };
            println!(
                "{:<32} {:<18} {:>12.1} {:>12.1} {:>6}",
                key, metric.metric, metric.mean, metric.median, metric.count
            );
        }
    }
    println!();
}
