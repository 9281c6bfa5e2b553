//! Reqwest-backed implementation of [`CatalogApi`].
//!
//! Owns transport details only: URL building, deadlines, status mapping and
//! JSON decoding into models.

use async_trait::async_trait;
use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;

use super::deadline::{with_deadline, CancelHandle, Deadline};
use super::dto::{
    BorrowerEnvelope, CheckoutEnvelope, CheckoutReceipt, CheckoutRequest, ErrorEnvelope,
    FinesEnvelope, HistoryEnvelope, LoansEnvelope, SearchEnvelope,
};
use super::health::HealthStatus;
use super::CatalogApi;
use crate::config::ApiConfig;
use crate::error::{AppError, AppResult};
use crate::models::{Borrower, CardId, Fine, HistoryEntry, Loan, SearchPage, SearchQuery};

const USER_AGENT: &str = concat!("library-web/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct HttpCatalogApi {
    client: Client,
    base_url: String,
    deadline: Deadline,
    health_deadline: Deadline,
    cancel: CancelHandle,
}

impl HttpCatalogApi {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        Url::parse(&config.base_url).map_err(|e| {
            AppError::Config(format!("invalid api.base_url '{}': {}", config.base_url, e))
        })?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            deadline: Deadline::after(config.timeout()),
            health_deadline: Deadline::after(config.health_timeout()),
            cancel: CancelHandle::new(),
        })
    }

    /// Handle that aborts every request issued through this client
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        deadline: Deadline,
    ) -> AppResult<T> {
        let url = self.url(path);
        tracing::debug!("GET {} {:?}", url, params);
        let request = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(params);
        with_deadline(decode(request), deadline, Some(&self.cancel)).await
    }

    async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        let url = self.url(path);
        tracing::debug!("POST {}", url);
        let request = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(body);
        with_deadline(decode(request), self.deadline, Some(&self.cancel)).await
    }
}

async fn decode<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> AppResult<T> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorEnvelope>(&body)
            .ok()
            .and_then(ErrorEnvelope::into_message);
        tracing::warn!("Backend answered {} ({:?})", status, message);
        return Err(AppError::HttpStatus {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_slice(&body)?)
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn health(&self) -> AppResult<HealthStatus> {
        self.get_json("health", &[], self.health_deadline).await
    }

    async fn search(&self, query: &SearchQuery) -> AppResult<SearchPage> {
        let envelope: SearchEnvelope = self
            .get_json("search", &query.to_params(), self.deadline)
            .await?;
        let (books, total) = envelope.into_result()?;
        tracing::debug!("Search returned {} of {} books", books.len(), total);
        Ok(SearchPage { books, total })
    }

    async fn checkout(&self, request: &CheckoutRequest) -> AppResult<CheckoutReceipt> {
        let envelope: CheckoutEnvelope = self.post_json("checkout", request).await?;
        envelope.into_result()
    }

    async fn borrower(&self, card_id: &CardId) -> AppResult<Borrower> {
        let envelope: BorrowerEnvelope = self
            .get_json(&format!("borrower/{}", card_id), &[], self.deadline)
            .await?;
        envelope.into_result()
    }

    async fn loans(&self, card_id: &CardId) -> AppResult<Vec<Loan>> {
        let envelope: LoansEnvelope = self
            .get_json(&format!("loans/{}", card_id), &[], self.deadline)
            .await?;
        envelope.into_result()
    }

    async fn fines(&self) -> AppResult<Vec<Fine>> {
        let envelope: FinesEnvelope = self.get_json("fines", &[], self.deadline).await?;
        envelope.into_result()
    }

    async fn history(&self, card_id: &CardId) -> AppResult<Vec<HistoryEntry>> {
        let envelope: HistoryEnvelope = self
            .get_json(&format!("history/{}", card_id), &[], self.deadline)
            .await?;
        envelope.into_result()
    }
}
