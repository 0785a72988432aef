//! # Catalog Search
//!
//! Debounced, last-request-wins search against the backend catalog.
//!
//! ## Keystroke Flow
//! ```text
//! keystroke ──► validate ──► debounce ──► request ──► still newest?
//!                  │ <2 chars   │ superseded            │      │ no
//!                  ▼            ▼ during sleep          ▼ yes  ▼
//!               Skipped      Superseded             Results  Superseded
//! ```
//!
//! Every call bumps a sequence counter; a call whose number is no
//! longer the newest discards its own work. In-flight requests are not
//! cancelled, their responses are simply dropped, so a slow response
//! for "par" can never overwrite the results for "paracetamol". The
//! staleness check runs both after the debounce sleep (a superseded
//! call never issues a request) and again after the response arrives.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use rxpos_core::validation::validate_search_query;
use rxpos_core::{CoreError, Customer, Medicine};

use crate::api::PharmacyApi;
use crate::config::ClientConfig;
use crate::error::ClientResult;

/// What became of one search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<T> {
    /// This call was the newest; here are its results.
    Results(Vec<T>),
    /// A newer keystroke arrived; this call's work was discarded.
    Superseded,
    /// The query was too short to search; show an empty list.
    Skipped,
}

impl<T> SearchOutcome<T> {
    /// The results, when this call produced any.
    pub fn into_results(self) -> Option<Vec<T>> {
        match self {
            SearchOutcome::Results(items) => Some(items),
            _ => None,
        }
    }
}

/// Debounced search frontend over the backend catalog endpoints.
///
/// One instance per search box; the sequence counter is what ties
/// "newest" to a specific input field.
pub struct DebouncedSearch<A: PharmacyApi> {
    api: Arc<A>,
    seq: AtomicU64,
    debounce: Duration,
    min_chars: usize,
}

impl<A: PharmacyApi> DebouncedSearch<A> {
    pub fn new(api: Arc<A>, config: &ClientConfig) -> Self {
        DebouncedSearch {
            api,
            seq: AtomicU64::new(0),
            debounce: config.search_debounce(),
            min_chars: config.search_min_chars,
        }
    }

    /// Searches the medicine catalog.
    pub async fn medicines(&self, query: &str) -> ClientResult<SearchOutcome<Medicine>> {
        self.run(query, |api, q| async move { api.search_medicines(&q).await })
            .await
    }

    /// Searches the customer directory.
    pub async fn customers(&self, query: &str) -> ClientResult<SearchOutcome<Customer>> {
        self.run(query, |api, q| async move { api.search_customers(&q).await })
            .await
    }

    async fn run<T, F, Fut>(&self, query: &str, fetch: F) -> ClientResult<SearchOutcome<T>>
    where
        F: FnOnce(Arc<A>, String) -> Fut,
        Fut: std::future::Future<Output = ClientResult<Vec<T>>>,
    {
        // Every keystroke claims a number, including ones that end up
        // skipped; a short query still supersedes older in-flight work.
        let my_seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        let query = match validate_search_query(query).map_err(CoreError::from)? {
            Some(q) if q.chars().count() >= self.min_chars => q,
            _ => return Ok(SearchOutcome::Skipped),
        };

        tokio::time::sleep(self.debounce).await;
        if self.seq.load(Ordering::SeqCst) != my_seq {
            return Ok(SearchOutcome::Superseded);
        }

        debug!(query = %query, seq = my_seq, "issuing search request");
        let results = fetch(self.api.clone(), query).await?;

        // A newer keystroke may have arrived while the response was in
        // flight; its results must win.
        if self.seq.load(Ordering::SeqCst) != my_seq {
            return Ok(SearchOutcome::Superseded);
        }

        Ok(SearchOutcome::Results(results))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use rxpos_core::{OrderStatus, PurchaseOrder, SaleReceipt};

    use crate::api::{
        PurchaseOrderRequest, ReceiveRequest, ReceiveResponse, SaleRequest,
    };
    use crate::error::ClientError;

    /// Catalog fake: records queries, answers with one medicine named
    /// after the query, optionally stalling per call.
    struct FakeCatalog {
        queries: Mutex<Vec<String>>,
        calls: AtomicUsize,
        response_delay: Option<Duration>,
    }

    impl FakeCatalog {
        fn new() -> Self {
            FakeCatalog {
                queries: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                response_delay: None,
            }
        }

        fn slow(delay_ms: u64) -> Self {
            FakeCatalog {
                response_delay: Some(Duration::from_millis(delay_ms)),
                ..Self::new()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PharmacyApi for FakeCatalog {
        async fn search_medicines(&self, query: &str) -> ClientResult<Vec<Medicine>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.to_string());
            if let Some(delay) = self.response_delay {
                tokio::time::sleep(delay).await;
            }
            Ok(vec![Medicine {
                id: 1,
                medicine_id: "MED-00001".to_string(),
                name: query.to_string(),
                generic_name: None,
                unit_price_cents: 1_000,
                unit: "tablet".to_string(),
                stock_quantity: 10,
                requires_prescription: false,
            }])
        }

        async fn search_customers(&self, _query: &str) -> ClientResult<Vec<Customer>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn submit_sale(&self, _request: &SaleRequest) -> ClientResult<SaleReceipt> {
            Err(ClientError::RequestFailed { reason: None })
        }

        async fn create_purchase_order(
            &self,
            _request: &PurchaseOrderRequest,
        ) -> ClientResult<PurchaseOrder> {
            Err(ClientError::RequestFailed { reason: None })
        }

        async fn receive_purchase_order(
            &self,
            _order_id: i64,
            _request: &ReceiveRequest,
        ) -> ClientResult<ReceiveResponse> {
            Err(ClientError::RequestFailed { reason: None })
        }

        async fn update_purchase_order_status(
            &self,
            _order_id: i64,
            _status: OrderStatus,
        ) -> ClientResult<OrderStatus> {
            Err(ClientError::RequestFailed { reason: None })
        }
    }

    fn search(api: Arc<FakeCatalog>) -> DebouncedSearch<FakeCatalog> {
        DebouncedSearch::new(api, &ClientConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_issues_no_request() {
        let api = Arc::new(FakeCatalog::new());
        let search = search(api.clone());

        assert_eq!(search.medicines("").await.unwrap(), SearchOutcome::Skipped);
        assert_eq!(search.medicines("p").await.unwrap(), SearchOutcome::Skipped);
        assert_eq!(search.medicines("  p  ").await.unwrap(), SearchOutcome::Skipped);
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn valid_query_returns_results() {
        let api = Arc::new(FakeCatalog::new());
        let search = search(api.clone());

        let outcome = search.medicines("paracetamol").await.unwrap();
        let results = outcome.into_results().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "paracetamol");
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_during_debounce_never_hits_backend() {
        let api = Arc::new(FakeCatalog::new());
        let search = search(api.clone());

        // Two keystrokes inside one debounce window. join! polls the
        // first into its sleep, then the second claims a newer number.
        let (first, second) = tokio::join!(
            search.medicines("par"),
            search.medicines("para")
        );

        assert_eq!(first.unwrap(), SearchOutcome::Superseded);
        assert_eq!(
            second.unwrap().into_results().unwrap()[0].name,
            "para"
        );
        // Only the winning keystroke reached the backend.
        assert_eq!(api.call_count(), 1);
        assert_eq!(*api.queries.lock().unwrap(), vec!["para".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_is_discarded_after_arrival() {
        // The backend stalls longer than the debounce window, so the
        // first call's response arrives after the second call has
        // already claimed a newer sequence number.
        let api = Arc::new(FakeCatalog::slow(1_000));
        let search = Arc::new(search(api.clone()));

        let slow = {
            let search = search.clone();
            tokio::spawn(async move { search.medicines("par").await })
        };
        // Let the first call get past its debounce and into the request.
        tokio::time::sleep(Duration::from_millis(500)).await;

        let fresh = search.medicines("paracetamol").await.unwrap();
        assert_eq!(fresh.into_results().unwrap()[0].name, "paracetamol");

        // The slow response came back, but its work is discarded.
        assert_eq!(slow.await.unwrap().unwrap(), SearchOutcome::Superseded);
        assert_eq!(api.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn overlong_query_is_an_error() {
        let api = Arc::new(FakeCatalog::new());
        let search = search(api.clone());

        let err = search.medicines(&"x".repeat(150)).await.unwrap_err();
        assert!(err.is_local());
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_still_supersedes_older_work() {
        // Typing then deleting back to one character: the deletion
        // must cancel the pending search even though it issues none
        // of its own.
        let api = Arc::new(FakeCatalog::new());
        let search = search(api.clone());

        let (older, newer) = tokio::join!(
            search.medicines("para"),
            search.medicines("p")
        );

        assert_eq!(older.unwrap(), SearchOutcome::Superseded);
        assert_eq!(newer.unwrap(), SearchOutcome::Skipped);
        assert_eq!(api.call_count(), 0);
    }
}
