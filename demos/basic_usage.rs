//! Basic facade usage example
//!
//! Demonstrates stream splitting, default fields and the line/format
//! variants of each level.
//!
//! Run with: cargo run --example basic_usage 2>/dev/null
//! (hide stderr to see that every record still reaches stdout)

use split_logging::prelude::*;
use split_logging::{debugf, errorln, infof, infoln, warnln};

fn main() {
    // Default text layout with full timestamps
    facade::initialize(None);
    facade::split_logs();

    infoln!("service", "starting");
    debugf!("loaded {} routes", 12);

    // Warnings and above also go to stderr
    warnln!("disk low");
    errorln!("upstream unreachable:", "billing-db");

    println!();
    facade::set_default_fields(Some(
        LogContext::new()
            .with_field("service", "billing")
            .with_field("region", "eu-west-1"),
    ));
    infof!("request handled in {}ms", 42);
    warnln!("slow query");

    facade::set_default_fields(None);
    infoln!("defaults cleared");

    println!();
    // Switch to a plain key=value layout
    facade::initialize(Some(Box::new(TextFormatter::new(
        FormatterConfig::new().with_force_colors(false),
    ))));
    facade::printf(format_args!("plain layout, {} fields", 0));

    let metrics = facade::logger().metrics();
    println!(
        "\nlogged: {}, dropped: {}",
        metrics.total_logged(),
        metrics.dropped_count()
    );
}
