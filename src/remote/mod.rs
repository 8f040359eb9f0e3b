// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    PricingTier, RevenueSettings, Transaction, TransactionDraft, TransactionPatch,
};

pub mod http;

pub use http::HttpStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store rejected request ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Request/response surface of the hosted data store, per identity. The
/// durable copy of record lives behind this trait; the in-memory session is
/// a cache reconciled against it.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, StoreError>;

    /// Returns the server-confirmed record, including the store-assigned id.
    async fn create_transaction(
        &self,
        user_id: &str,
        draft: &TransactionDraft,
    ) -> Result<Transaction, StoreError>;

    async fn update_transaction(
        &self,
        id: &str,
        patch: &TransactionPatch,
    ) -> Result<(), StoreError>;

    async fn delete_transaction(&self, id: &str) -> Result<(), StoreError>;

    /// `None` means no settings row exists yet for this identity.
    async fn fetch_settings(&self, user_id: &str) -> Result<Option<RevenueSettings>, StoreError>;

    /// Create-or-replace keyed by identity; never duplicates.
    async fn upsert_settings(
        &self,
        user_id: &str,
        settings: &RevenueSettings,
    ) -> Result<(), StoreError>;

    async fn list_tiers(&self, user_id: &str) -> Result<Vec<PricingTier>, StoreError>;

    async fn delete_tiers(&self, user_id: &str) -> Result<(), StoreError>;

    async fn insert_tiers(&self, user_id: &str, tiers: &[PricingTier]) -> Result<(), StoreError>;
}
