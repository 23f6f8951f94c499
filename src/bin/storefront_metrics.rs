//! storefront-metrics: one-shot metrics report
//!
//! Loads a dataset from the configured metrics source, composes a report
//! and prints it to stdout as pretty JSON. Logs go to stderr.
//!
//! ## Configuration
//! - METRICS_CONFIG: Path to a YAML config file (optional, `metrics.yaml` is read if present)
//! - METRICS_REPORT: `dashboard` (default), `business` or `trends`
//! - METRICS_TIMEFRAME: `7d`, `30d`, `90d` or `1y` (default: engine.default_timeframe)
//! - METRICS_GROUP_BY: `day`, `week` or `month` (default: engine.default_group_by)
//! - METRICS_LOG: Log filter (default: info)

use tracing::info;

use storefront_metrics::config::{GROUP_BY_ENV_VAR, REPORT_ENV_VAR, TIMEFRAME_ENV_VAR};
use storefront_metrics::metrics::{Granularity, Timeframe};
use storefront_metrics::utils::bootstrap::{init_tracing, load_source};
use storefront_metrics::{AnalyticsService, DashboardService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let (config, source) = load_source(None).await?;
    let engine = config.engine;

    let timeframe = std::env::var(TIMEFRAME_ENV_VAR)
        .map(|t| Timeframe::parse(&t))
        .unwrap_or(engine.default_timeframe);
    let group_by = std::env::var(GROUP_BY_ENV_VAR)
        .map(|g| Granularity::parse(&g))
        .unwrap_or(engine.default_group_by);
    let report = std::env::var(REPORT_ENV_VAR).unwrap_or_else(|_| "dashboard".to_string());

    info!(
        report = %report,
        timeframe = %timeframe,
        group_by = %group_by,
        "storefront-metrics started"
    );

    let output = match report.as_str() {
        "dashboard" => {
            let service = DashboardService::new(source, engine);
            let dashboard = service
                .get_dashboard_stats_grouped(timeframe, group_by, chrono::Utc::now())
                .await?;
            serde_json::to_string_pretty(&dashboard)?
        }
        "business" => {
            let service = AnalyticsService::new(source, engine);
            let metrics = service.get_business_metrics_now(timeframe).await?;
            serde_json::to_string_pretty(&metrics)?
        }
        "trends" => {
            let service = AnalyticsService::new(source, engine);
            let trends = service.get_sales_trends_now(timeframe, group_by).await?;
            serde_json::to_string_pretty(&trends)?
        }
        other => {
            return Err(format!(
                "Unknown report: {} (expected dashboard, business or trends)",
                other
            )
            .into())
        }
    };

    println!("{}", output);
    Ok(())
}
