use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

/// Aggregated result pushed to the configured webhook
///
/// `linked_companies` is `null` when the company record listed no
/// representatives at all; a list with only non-qualifying entries
/// produces an empty array instead.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub job_id: String,
    pub company_data: Value,
    pub linked_companies: Option<Vec<Value>>,
}

/// Sending side of the dispatch queue, shared with request handlers
///
/// Delivery is best effort: enqueueing never blocks the response path, and
/// a full queue drops the payload with a log line.
#[derive(Clone)]
pub struct DispatchHandle {
    tx: mpsc::Sender<WebhookPayload>,
}

impl DispatchHandle {
    pub fn new(tx: mpsc::Sender<WebhookPayload>) -> Self {
        Self { tx }
    }

    /// Queue a payload for delivery without waiting for the outcome
    pub fn enqueue(&self, payload: WebhookPayload) {
        let job_id = payload.job_id.clone();
        match self.tx.try_send(payload) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                error!("Dispatcher: queue full, dropping payload for job {}", job_id);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!(
                    "Dispatcher: dispatcher stopped, dropping payload for job {}",
                    job_id
                );
            }
        }
    }
}

/// Background task delivering queued payloads to the webhook URL
///
/// Each payload gets exactly one delivery attempt; success or failure is
/// logged and never fed back into job status. On shutdown the task drains
/// payloads already queued before exiting.
pub struct WebhookDispatcher {
    client: reqwest::Client,
    url: String,
    rx: mpsc::Receiver<WebhookPayload>,
}

impl WebhookDispatcher {
    /// Build a dispatcher and the handle used to feed it
    pub fn new(client: reqwest::Client, url: String, capacity: usize) -> (Self, DispatchHandle) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { client, url, rx }, DispatchHandle::new(tx))
    }

    /// Run the delivery loop until shutdown is signaled
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        info!("Dispatcher started, target {}", self.url);

        loop {
            tokio::select! {
                received = self.rx.recv() => match received {
                    Some(payload) => self.deliver(payload).await,
                    // All senders dropped
                    None => break,
                },
                _ = shutdown_rx.changed() => {
                    info!("Dispatcher: shutdown signaled, draining queue");
                    self.rx.close();
                    while let Some(payload) = self.rx.recv().await {
                        self.deliver(payload).await;
                    }
                    break;
                }
            }
        }

        info!("Dispatcher stopped");
    }

    async fn deliver(&self, payload: WebhookPayload) {
        match self.client.post(&self.url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Dispatcher: delivered result for job {}", payload.job_id);
            }
            Ok(response) => {
                warn!(
                    "Dispatcher: webhook returned {} for job {}",
                    response.status(),
                    payload.job_id
                );
            }
            Err(e) => {
                error!(
                    "Dispatcher: failed to deliver result for job {}: {}",
                    payload.job_id, e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_serializes_with_camel_case_keys() {
        let payload = WebhookPayload {
            job_id: "abc".to_string(),
            company_data: json!({ "siren": "123456789" }),
            linked_companies: Some(vec![json!({ "resultats": [] })]),
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["jobId"], "abc");
        assert_eq!(value["companyData"]["siren"], "123456789");
        assert_eq!(value["linkedCompanies"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn absent_linked_companies_serializes_as_null() {
        let payload = WebhookPayload {
            job_id: "abc".to_string(),
            company_data: json!({}),
            linked_companies: None,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert!(value["linkedCompanies"].is_null());
    }

    #[actix_web::test]
    async fn shutdown_drains_queued_payloads_and_exits() {
        // Unroutable port: every delivery attempt fails fast, which is
        // enough for best-effort semantics
        let (dispatcher, handle) =
            WebhookDispatcher::new(reqwest::Client::new(), "http://127.0.0.1:1".to_string(), 8);

        for i in 0..3 {
            handle.enqueue(WebhookPayload {
                job_id: format!("job-{}", i),
                company_data: json!({}),
                linked_companies: None,
            });
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(dispatcher.run(shutdown_rx));
        shutdown_tx.send(true).unwrap();

        // The task must attempt the queued deliveries and then stop
        tokio::time::timeout(std::time::Duration::from_secs(10), task)
            .await
            .expect("dispatcher did not stop after shutdown signal")
            .unwrap();
    }

    #[actix_web::test]
    async fn full_queue_drops_instead_of_blocking() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = DispatchHandle::new(tx);

        let payload = WebhookPayload {
            job_id: "a".to_string(),
            company_data: json!({}),
            linked_companies: None,
        };
        handle.enqueue(payload.clone());
        // Queue is full now; this one is dropped, not awaited
        handle.enqueue(WebhookPayload {
            job_id: "b".to_string(),
            ..payload
        });

        assert_eq!(rx.recv().await.unwrap().job_id, "a");
        assert!(rx.try_recv().is_err());
    }
}
