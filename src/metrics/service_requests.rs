//! Service request status breakdown.

use std::collections::HashMap;

use serde::Serialize;

use super::growth::percentage;
use super::period::Period;
use crate::model::{ServiceRequestRecord, ServiceStatus};

/// Count of service requests in one status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatusShare {
    pub status: ServiceStatus,
    pub count: u64,
    pub percentage: f64,
}

/// Service requests created in `period`, by status.
///
/// Cancelled requests are counted like any other status. Only statuses with
/// at least one request appear, in lifecycle order.
pub fn service_stats(requests: &[ServiceRequestRecord], period: &Period) -> Vec<ServiceStatusShare> {
    let mut counts: HashMap<ServiceStatus, u64> = HashMap::new();
    let mut total = 0u64;
    for request in requests.iter().filter(|r| period.contains(r.created_at)) {
        *counts.entry(request.status).or_default() += 1;
        total += 1;
    }

    ServiceStatus::ALL
        .into_iter()
        .filter_map(|status| {
            counts.get(&status).map(|&count| ServiceStatusShare {
                status,
                count,
                percentage: percentage(count as f64, total as f64),
            })
        })
        .collect()
}
