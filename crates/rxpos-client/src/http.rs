//! # HTTP API Implementation
//!
//! The reqwest-backed implementation of [`PharmacyApi`].
//!
//! ## Response Mapping
//! ```text
//! 2xx                          -> deserialized body
//! 401                          -> session invalidated, RequestFailed
//! 409 (receive raced a change) -> ConflictOnReceive
//! other non-2xx with {"detail"}-> RequestFailed { reason: Some(detail) }
//! transport failure            -> RequestFailed { reason: None }
//! ```
//!
//! The server's detail string is passed through verbatim; the UI shows
//! it to the operator unchanged.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use rxpos_core::{Customer, Medicine, OrderStatus, PurchaseOrder, SaleReceipt};

use crate::api::{
    PharmacyApi, PurchaseOrderRequest, ReceiveRequest, ReceiveResponse, SaleRequest,
    StatusResponse,
};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Error body shape used by the backend for every rejection.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: OrderStatus,
}

/// HTTP client for the pharmacy backend.
pub struct HttpApi {
    http: Client,
    base_url: Url,
    session: Session,
}

impl HttpApi {
    /// Builds a client from configuration. The bearer credential is
    /// read from `session` on every request, so login/logout take
    /// effect without rebuilding the client.
    pub fn new(config: &ClientConfig, session: Session) -> ClientResult<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::ConfigLoadFailed(format!("invalid base_url: {}", e)))?;

        // Url::join replaces the last path segment unless the base
        // ends with a slash.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ClientError::ConfigLoadFailed(e.to_string()))?;

        Ok(HttpApi {
            http,
            base_url,
            session,
        })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::ConfigLoadFailed(format!("invalid endpoint {}: {}", path, e)))
    }

    /// Attaches the bearer credential and sends, mapping transport
    /// failures and non-2xx statuses to the error taxonomy.
    async fn send(&self, request: reqwest::RequestBuilder) -> ClientResult<Response> {
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|_| ClientError::RequestFailed { reason: None })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.session.invalidate();
        }

        if status == StatusCode::CONFLICT {
            return Err(ClientError::ConflictOnReceive);
        }

        let reason = response
            .json::<ErrorBody>()
            .await
            .ok()
            .map(|body| body.detail);

        Err(ClientError::RequestFailed { reason })
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        response.json().await.map_err(|e| ClientError::RequestFailed {
            reason: Some(format!("invalid response body: {}", e)),
        })
    }
}

#[async_trait]
impl PharmacyApi for HttpApi {
    async fn search_medicines(&self, query: &str) -> ClientResult<Vec<Medicine>> {
        debug!(query = %query, "search medicines");
        let url = self.endpoint("pos/search-medicine")?;
        let response = self
            .send(self.http.get(url).query(&[("query", query)]))
            .await?;
        Self::parse(response).await
    }

    async fn search_customers(&self, query: &str) -> ClientResult<Vec<Customer>> {
        debug!(query = %query, "search customers");
        let url = self.endpoint("pos/search-customer")?;
        let response = self
            .send(self.http.get(url).query(&[("query", query)]))
            .await?;
        Self::parse(response).await
    }

    async fn submit_sale(&self, request: &SaleRequest) -> ClientResult<SaleReceipt> {
        debug!(items = request.items.len(), "submit sale");
        let url = self.endpoint("pos/process-sale")?;
        let response = self.send(self.http.post(url).json(request)).await?;
        Self::parse(response).await
    }

    async fn create_purchase_order(
        &self,
        request: &PurchaseOrderRequest,
    ) -> ClientResult<PurchaseOrder> {
        debug!(supplier_id = request.supplier_id, items = request.items.len(), "create purchase order");
        let url = self.endpoint("purchases")?;
        let response = self.send(self.http.post(url).json(request)).await?;
        Self::parse(response).await
    }

    async fn receive_purchase_order(
        &self,
        order_id: i64,
        request: &ReceiveRequest,
    ) -> ClientResult<ReceiveResponse> {
        debug!(order_id, status_hint = %request.status_hint, "receive purchase order");
        let url = self.endpoint(&format!("purchases/{}/receive", order_id))?;
        let response = self.send(self.http.put(url).json(request)).await?;
        Self::parse(response).await
    }

    async fn update_purchase_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> ClientResult<OrderStatus> {
        debug!(order_id, %status, "update purchase order status");
        let url = self.endpoint(&format!("purchases/{}/status", order_id))?;
        let response = self
            .send(self.http.put(url).json(&StatusBody { status }))
            .await?;
        let body: StatusResponse = Self::parse(response).await?;
        Ok(body.status)
    }
}
