//! In-memory metrics source.
//!
//! Holds a [`Dataset`] snapshot. Used by the CLI for JSON/YAML snapshots
//! and by tests, which can inject failures and latency.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::debug;

use crate::interfaces::metrics_source::{MetricsSource, Result, SourceError};
use crate::metrics::Period;
use crate::model::{
    CustomerRecord, Dataset, OrderItemRecord, OrderRecord, ProductRecord, ServiceRequestRecord,
};

/// Metrics source backed by an in-memory dataset.
#[derive(Default)]
pub struct InMemoryMetricsSource {
    dataset: RwLock<Dataset>,
    fail_on_read: RwLock<bool>,
    latency: RwLock<Option<Duration>>,
}

impl InMemoryMetricsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            dataset: RwLock::new(dataset),
            ..Default::default()
        }
    }

    /// Load a dataset snapshot from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SourceError::Unavailable(format!("failed to read '{}': {}", path.display(), e))
        })?;

        let dataset: Dataset = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| SourceError::Decode(e.to_string()))?
            }
            _ => serde_json::from_str(&content).map_err(|e| SourceError::Decode(e.to_string()))?,
        };

        debug!(
            path = %path.display(),
            orders = dataset.orders.len(),
            customers = dataset.customers.len(),
            products = dataset.products.len(),
            "Loaded dataset snapshot"
        );
        Ok(Self::from_dataset(dataset))
    }

    /// Replace the whole dataset.
    pub async fn replace(&self, dataset: Dataset) {
        *self.dataset.write().await = dataset;
    }

    /// Mutate the dataset in place.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Dataset),
    {
        f(&mut *self.dataset.write().await);
    }

    pub async fn set_fail_on_read(&self, fail: bool) {
        *self.fail_on_read.write().await = fail;
    }

    /// Delay every read by `latency`, simulating a slow database.
    pub async fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write().await = latency;
    }

    async fn read(&self) -> Result<RwLockReadGuard<'_, Dataset>> {
        let latency = *self.latency.read().await;
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
        if *self.fail_on_read.read().await {
            return Err(SourceError::Unavailable(
                "in-memory source configured to fail".to_string(),
            ));
        }
        Ok(self.dataset.read().await)
    }
}

#[async_trait]
impl MetricsSource for InMemoryMetricsSource {
    async fn orders_between(&self, period: &Period) -> Result<Vec<OrderRecord>> {
        let dataset = self.read().await?;
        Ok(dataset
            .orders
            .iter()
            .filter(|o| period.contains(o.created_at))
            .cloned()
            .collect())
    }

    async fn order_items_between(&self, period: &Period) -> Result<Vec<OrderItemRecord>> {
        let dataset = self.read().await?;
        let order_ids: std::collections::HashSet<&str> = dataset
            .orders
            .iter()
            .filter(|o| period.contains(o.created_at))
            .map(|o| o.id.as_str())
            .collect();
        Ok(dataset
            .order_items
            .iter()
            .filter(|i| order_ids.contains(i.order_id.as_str()))
            .cloned()
            .collect())
    }

    async fn all_orders(&self) -> Result<Vec<OrderRecord>> {
        Ok(self.read().await?.orders.clone())
    }

    async fn customers(&self) -> Result<Vec<CustomerRecord>> {
        Ok(self.read().await?.customers.clone())
    }

    async fn customers_created_between(&self, period: &Period) -> Result<Vec<CustomerRecord>> {
        let dataset = self.read().await?;
        Ok(dataset
            .customers
            .iter()
            .filter(|c| period.contains(c.created_at))
            .cloned()
            .collect())
    }

    async fn service_requests_between(
        &self,
        period: &Period,
    ) -> Result<Vec<ServiceRequestRecord>> {
        let dataset = self.read().await?;
        Ok(dataset
            .service_requests
            .iter()
            .filter(|s| period.contains(s.created_at))
            .cloned()
            .collect())
    }

    async fn products(&self) -> Result<Vec<ProductRecord>> {
        Ok(self.read().await?.products.clone())
    }
}
