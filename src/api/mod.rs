//! Backend access for the library web client

pub mod client;
pub mod deadline;
pub mod dto;
pub mod health;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Borrower, CardId, Fine, HistoryEntry, Loan, SearchPage, SearchQuery};

pub use client::HttpCatalogApi;
pub use deadline::{with_deadline, CancelHandle, Deadline};
pub use dto::{CheckoutReceipt, CheckoutRequest};
pub use health::HealthStatus;

/// REST endpoints the controllers depend on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET /health`
    async fn health(&self) -> AppResult<HealthStatus>;

    /// `GET /search?q&status&limit&offset`
    async fn search(&self, query: &SearchQuery) -> AppResult<SearchPage>;

    /// `POST /checkout`
    async fn checkout(&self, request: &CheckoutRequest) -> AppResult<CheckoutReceipt>;

    /// `GET /borrower/{card_id}`
    async fn borrower(&self, card_id: &CardId) -> AppResult<Borrower>;

    /// `GET /loans/{card_id}`
    async fn loans(&self, card_id: &CardId) -> AppResult<Vec<Loan>>;

    /// `GET /fines`, every patron's fines
    async fn fines(&self) -> AppResult<Vec<Fine>>;

    /// `GET /history/{card_id}`
    async fn history(&self, card_id: &CardId) -> AppResult<Vec<HistoryEntry>>;
}
