//! Acceptance tests for the metrics engine using Cucumber.
//!
//! Scenarios under `features/metrics` exercise the pure aggregation
//! functions; `features/services` run through the services over an
//! in-memory source. A failing scenario fails the test binary.
//!
//! ```bash
//! cargo test --test acceptance --features test-utils
//! ```

mod steps;

use cucumber::World;
use steps::dashboard::DashboardWorld;
use steps::metrics::MetricsWorld;

#[tokio::main]
async fn main() {
    println!("\n=== Running Metrics Acceptance Tests ===\n");
    MetricsWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("tests/acceptance/features/metrics")
        .await;

    println!("\n=== Running Service Acceptance Tests ===\n");
    DashboardWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("tests/acceptance/features/services")
        .await;
}
