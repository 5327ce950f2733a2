//! Store decorator bounding the latency of every call

use std::sync::Arc;
use std::time::Duration;

use crate::error::MedifactError;
use crate::filter::ReportFilter;
use crate::models::{CombinationReport, Drug};
use crate::store::{GroupCount, GroupField, ReportStore, StoreFuture};

/// Wraps a store so that calls exceeding `timeout` fail with `StoreUnavailable`
#[derive(Debug)]
pub struct TimeoutStore<S: ?Sized> {
    inner: Arc<S>,
    timeout: Duration,
}

impl<S: ReportStore + ?Sized> TimeoutStore<S> {
    /// Bound every call to `inner` by `timeout`
    #[must_use]
    pub const fn new(inner: Arc<S>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    fn bounded<'a, T: Send + 'a>(
        &'a self,
        operation: &'static str,
        call: StoreFuture<'a, T>,
    ) -> StoreFuture<'a, T> {
        let timeout = self.timeout;
        Box::pin(async move {
            match tokio::time::timeout(timeout, call).await {
                Ok(result) => result,
                Err(_) => {
                    log::warn!("Store {operation} timed out after {timeout:?}");
                    Err(MedifactError::store(format!(
                        "{operation} timed out after {timeout:?}"
                    )))
                }
            }
        })
    }
}

impl<S: ReportStore + ?Sized> ReportStore for TimeoutStore<S> {
    fn count<'a>(&'a self, filter: &'a ReportFilter) -> StoreFuture<'a, u64> {
        self.bounded("count", self.inner.count(filter))
    }

    fn find_drugs<'a>(&'a self, names: &'a [String]) -> StoreFuture<'a, Vec<Drug>> {
        self.bounded("find_drugs", self.inner.find_drugs(names))
    }

    fn group_by<'a>(
        &'a self,
        field: GroupField,
        filter: &'a ReportFilter,
    ) -> StoreFuture<'a, Vec<GroupCount>> {
        self.bounded("group_by", self.inner.group_by(field, filter))
    }

    fn insert(&self, report: CombinationReport) -> StoreFuture<'_, ()> {
        self.bounded("insert", self.inner.insert(report))
    }

    fn upsert_drug_if_absent(&self, candidate: Drug) -> StoreFuture<'_, Drug> {
        self.bounded("upsert_drug_if_absent", self.inner.upsert_drug_if_absent(candidate))
    }

    fn reset(&self) -> StoreFuture<'_, ()> {
        self.bounded("reset", self.inner.reset())
    }
}
