// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    PricingTier, RevenueSettings, Transaction, TransactionDraft, TransactionPatch,
    TransactionStatus,
};
use crate::remote::{RemoteStore, StoreError};
use crate::utils::http_client;

/// Client for the hosted backend's REST surface. Rows are scoped per
/// identity via `user_id` filters; the settings row is keyed by the
/// identity id itself.
pub struct HttpStore {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: String,
}

impl HttpStore {
    pub fn new(base_url: &str, api_key: &str, access_token: &str) -> Result<Self> {
        Ok(HttpStore {
            client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn rest_url(&self, table: &str, filter: &str) -> String {
        format!("{}/rest/v1/{}?{}", self.base_url, table, filter)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(&self.access_token)
    }
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

#[derive(Serialize)]
struct InsertTransaction<'a> {
    #[serde(flatten)]
    draft: &'a TransactionDraft,
    status: TransactionStatus,
    user_id: &'a str,
}

#[derive(Serialize)]
struct ProfileUpsert<'a> {
    id: &'a str,
    baseline: Decimal,
    target: Decimal,
}

#[derive(Deserialize)]
struct ProfileRow {
    #[serde(default)]
    baseline: Decimal,
    #[serde(default)]
    target: Decimal,
}

#[derive(Serialize)]
struct TierInsert<'a> {
    id: &'a str,
    price: Decimal,
    user_id: &'a str,
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, StoreError> {
        let url = self.rest_url(
            "transactions",
            &format!("select=*&user_id=eq.{}&order=occurred_at.desc", user_id),
        );
        let response = check(self.authed(self.client.get(url)).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn create_transaction(
        &self,
        user_id: &str,
        draft: &TransactionDraft,
    ) -> Result<Transaction, StoreError> {
        let url = self.rest_url("transactions", "select=*");
        let row = InsertTransaction {
            draft,
            status: TransactionStatus::Completed,
            user_id,
        };
        let response = check(
            self.authed(self.client.post(url))
                .header("Prefer", "return=representation")
                .json(&[row])
                .send()
                .await?,
        )
        .await?;
        let mut created: Vec<Transaction> = response.json().await?;
        created.pop().ok_or(StoreError::Api {
            status: 200,
            message: "insert returned no representation".to_string(),
        })
    }

    async fn update_transaction(
        &self,
        id: &str,
        patch: &TransactionPatch,
    ) -> Result<(), StoreError> {
        let url = self.rest_url("transactions", &format!("id=eq.{}", id));
        check(
            self.authed(self.client.patch(url))
                .json(patch)
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }

    async fn delete_transaction(&self, id: &str) -> Result<(), StoreError> {
        let url = self.rest_url("transactions", &format!("id=eq.{}", id));
        check(self.authed(self.client.delete(url)).send().await?).await?;
        Ok(())
    }

    async fn fetch_settings(&self, user_id: &str) -> Result<Option<RevenueSettings>, StoreError> {
        let url = self.rest_url(
            "profiles",
            &format!("select=baseline,target&id=eq.{}", user_id),
        );
        let response = check(self.authed(self.client.get(url)).send().await?).await?;
        let rows: Vec<ProfileRow> = response.json().await?;
        Ok(rows.into_iter().next().map(|row| RevenueSettings {
            baseline: row.baseline,
            target: row.target,
        }))
    }

    async fn upsert_settings(
        &self,
        user_id: &str,
        settings: &RevenueSettings,
    ) -> Result<(), StoreError> {
        let url = self.rest_url("profiles", "select=id");
        let row = ProfileUpsert {
            id: user_id,
            baseline: settings.baseline,
            target: settings.target,
        };
        check(
            self.authed(self.client.post(url))
                .header("Prefer", "resolution=merge-duplicates")
                .json(&[row])
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }

    async fn list_tiers(&self, user_id: &str) -> Result<Vec<PricingTier>, StoreError> {
        let url = self.rest_url(
            "pricing_tiers",
            &format!("select=id,price&user_id=eq.{}", user_id),
        );
        let response = check(self.authed(self.client.get(url)).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn delete_tiers(&self, user_id: &str) -> Result<(), StoreError> {
        let url = self.rest_url("pricing_tiers", &format!("user_id=eq.{}", user_id));
        check(self.authed(self.client.delete(url)).send().await?).await?;
        Ok(())
    }

    async fn insert_tiers(&self, user_id: &str, tiers: &[PricingTier]) -> Result<(), StoreError> {
        let rows: Vec<TierInsert<'_>> = tiers
            .iter()
            .map(|tier| TierInsert {
                id: &tier.id,
                price: tier.price,
                user_id,
            })
            .collect();
        let url = self.rest_url("pricing_tiers", "select=id");
        check(self.authed(self.client.post(url)).json(&rows).send().await?).await?;
        Ok(())
    }
}
