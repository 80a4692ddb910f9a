use futures_util::stream::{self, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::jobs::{JobRegistry, JobStatus};
use crate::pappers::models::representatives_of;
use crate::pappers::{RegistryClient, Representative};
use crate::webhook::{DispatchHandle, WebhookPayload};

/// Company lookup pipeline
///
/// One call to [`run_lookup`](Self::run_lookup) covers a full job: fetch the
/// primary record, fan out linked-company searches for its qualifying
/// representatives, hand the aggregate to the dispatcher, and settle the
/// job's status. The pipeline is awaited by the request handler, so the
/// caller never observes an in-progress job of its own.
pub struct CompanyService {
    client: Arc<dyn RegistryClient>,
    registry: Arc<JobRegistry>,
    dispatcher: DispatchHandle,
    lookup_concurrency: usize,
}

impl CompanyService {
    pub fn new(
        client: Arc<dyn RegistryClient>,
        registry: Arc<JobRegistry>,
        dispatcher: DispatchHandle,
        lookup_concurrency: usize,
    ) -> Self {
        Self {
            client,
            registry,
            dispatcher,
            lookup_concurrency: lookup_concurrency.max(1),
        }
    }

    /// Run one lookup job end to end and return its id
    pub async fn run_lookup(&self, siren: &str) -> String {
        let job_id = self.registry.create();
        info!("Service: job {} looking up siren {}", job_id, siren);

        match self.fetch_primary(siren).await {
            Some(company_data) => {
                let representatives = representatives_of(&company_data);
                let linked_companies = self.fetch_linked(&job_id, representatives).await;

                self.dispatcher.enqueue(WebhookPayload {
                    job_id: job_id.clone(),
                    company_data,
                    linked_companies,
                });
                self.registry.set_status(&job_id, JobStatus::Completed);
            }
            None => {
                self.registry.set_status(&job_id, JobStatus::Failed);
            }
        }

        job_id
    }

    /// Fetch the primary company record
    ///
    /// The only recovered error on the primary path: any failure is logged
    /// and mapped to `None`, which the caller turns into job status failed.
    async fn fetch_primary(&self, siren: &str) -> Option<Value> {
        match self.client.fetch_company(siren).await {
            Ok(company) => Some(company),
            Err(e) => {
                error!("Service: primary fetch failed for siren {}: {}", siren, e);
                None
            }
        }
    }

    /// Search linked companies for each qualifying representative
    ///
    /// Returns `None` when the record lists no representatives. Searches run
    /// with bounded parallelism and keep the representatives' original
    /// relative order. A failed search is logged and skipped; it never
    /// aborts the remaining lookups.
    async fn fetch_linked(
        &self,
        job_id: &str,
        representatives: Vec<Representative>,
    ) -> Option<Vec<Value>> {
        if representatives.is_empty() {
            return None;
        }

        let first_names: Vec<String> = representatives
            .into_iter()
            .filter(Representative::qualifies_for_lookup)
            .filter_map(|rep| rep.prenom)
            .collect();

        let results: Vec<_> = stream::iter(first_names)
            .map(|first_name| {
                let client = self.client.clone();
                async move {
                    let result = client.search_by_director(&first_name).await;
                    (first_name, result)
                }
            })
            .buffered(self.lookup_concurrency)
            .collect()
            .await;

        let mut linked = Vec::new();
        let mut failed = 0usize;
        for (first_name, result) in results {
            match result {
                Ok(companies) => linked.push(companies),
                Err(e) => {
                    failed += 1;
                    warn!(
                        "Service: job {} linked search for '{}' failed: {}",
                        job_id, first_name, e
                    );
                }
            }
        }

        if failed > 0 {
            warn!(
                "Service: job {} finished fan-out with {} failed searches",
                job_id, failed
            );
        }

        Some(linked)
    }
}
