//! PostgREST-style HTTP backend for the hosted database.
//!
//! Rows are addressed with query-string filters (`?id=eq.<id>`), inserts
//! are POSTs of JSON bodies, and partial updates are PATCHes. The
//! arrangement upsert keeps the original system's policy: check
//! existence, then branch insert vs. update.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::{
    ArrangementKey, ArrangementRecord, ContentId, Document, FeaturedItem, Tutorial,
};

use super::{ArrangementStore, ContentStore, DocumentPatch, StoreError, TutorialPatch};

const TABLE_DOCUMENTS: &str = "documents";
const TABLE_TUTORIALS: &str = "tutorials";
const TABLE_FEATURED: &str = "featured_content";
const TABLE_ARRANGEMENTS: &str = "content_arrangements";

/// HTTP client for a PostgREST-style row API
pub struct RestBackend {
    /// Base URL of the REST endpoint (e.g. "https://xyz.example.co/rest/v1")
    base_url: String,
    /// HTTP client with auth headers pre-installed
    client: reqwest::Client,
}

impl RestBackend {
    /// Create a backend for the given endpoint and API key
    pub fn new(base_url: impl Into<String>, api_key: &str) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(api_key)
            .map_err(|_| StoreError::Backend("API key contains invalid characters".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| StoreError::Backend("API key contains invalid characters".to_string()))?;
        headers.insert("apikey", key_value);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    /// Turn a non-2xx response into a backend error carrying the body
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Backend(format!(
            "{} - {}",
            status,
            body.trim()
        )))
    }

    /// GET rows matching the given filters
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .client
            .get(self.table_url(table))
            .query(filters)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    /// POST one row
    async fn insert<T: Serialize>(&self, table: &str, row: &T) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.table_url(table))
            .json(row)
            .send()
            .await?;

        Self::check(response).await?;
        Ok(())
    }

    /// PATCH rows matching the given filters; returns the updated rows
    async fn update<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
        body: &T,
    ) -> Result<Vec<R>, StoreError> {
        let response = self
            .client
            .patch(self.table_url(table))
            .header("Prefer", "return=representation")
            .query(filters)
            .json(body)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    /// DELETE rows matching the given filters; returns how many went away
    async fn delete(&self, table: &str, filters: &[(&str, String)]) -> Result<usize, StoreError> {
        let response = self
            .client
            .delete(self.table_url(table))
            .header("Prefer", "return=representation")
            .query(filters)
            .send()
            .await?;

        let rows: Vec<serde_json::Value> = Self::check(response).await?.json().await?;
        Ok(rows.len())
    }

    fn id_filter(id: &ContentId) -> [(&'static str, String); 1] {
        [("id", format!("eq.{}", id))]
    }

    fn key_filters(key: &ArrangementKey) -> [(&'static str, String); 2] {
        [
            ("category", format!("eq.{}", key.category)),
            ("kind", format!("eq.{}", key.kind)),
        ]
    }
}

#[async_trait]
impl ArrangementStore for RestBackend {
    async fn find(&self, key: &ArrangementKey) -> Result<Option<ArrangementRecord>, StoreError> {
        let mut records: Vec<ArrangementRecord> = self
            .select(TABLE_ARRANGEMENTS, &Self::key_filters(key))
            .await?;

        // At most one record per key; a duplicate would be a backend bug
        Ok(if records.is_empty() {
            None
        } else {
            Some(records.swap_remove(0))
        })
    }

    async fn upsert(&self, key: &ArrangementKey, order: Vec<ContentId>) -> Result<(), StoreError> {
        match self.find(key).await? {
            Some(existing) => {
                let body = serde_json::json!({
                    "order": order,
                    "updated_at": Utc::now(),
                });
                let _updated: Vec<ArrangementRecord> = self
                    .update(
                        TABLE_ARRANGEMENTS,
                        &[("id", format!("eq.{}", existing.id))],
                        &body,
                    )
                    .await?;
                Ok(())
            }
            None => {
                let record = ArrangementRecord::new(key.clone(), order);
                self.insert(TABLE_ARRANGEMENTS, &record).await
            }
        }
    }
}

#[async_trait]
impl ContentStore for RestBackend {
    async fn insert_document(&self, document: Document) -> Result<Document, StoreError> {
        self.insert(TABLE_DOCUMENTS, &document).await?;
        Ok(document)
    }

    async fn update_document(
        &self,
        id: &ContentId,
        patch: DocumentPatch,
    ) -> Result<Document, StoreError> {
        let mut body = serde_json::to_value(&patch)?;
        body["updated_at"] = serde_json::to_value(Utc::now())?;

        let mut rows: Vec<Document> = self
            .update(TABLE_DOCUMENTS, &Self::id_filter(id), &body)
            .await?;
        if rows.is_empty() {
            return Err(StoreError::NoSuchRecord(id.to_string()));
        }
        Ok(rows.swap_remove(0))
    }

    async fn delete_document(&self, id: &ContentId) -> Result<(), StoreError> {
        if self.delete(TABLE_DOCUMENTS, &Self::id_filter(id)).await? == 0 {
            return Err(StoreError::NoSuchRecord(id.to_string()));
        }
        Ok(())
    }

    async fn find_document(&self, id: &ContentId) -> Result<Option<Document>, StoreError> {
        let mut rows: Vec<Document> = self.select(TABLE_DOCUMENTS, &Self::id_filter(id)).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    async fn list_documents(&self, category: &str) -> Result<Vec<Document>, StoreError> {
        self.select(
            TABLE_DOCUMENTS,
            &[
                ("category", format!("eq.{}", category)),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    async fn insert_tutorial(&self, tutorial: Tutorial) -> Result<Tutorial, StoreError> {
        self.insert(TABLE_TUTORIALS, &tutorial).await?;
        Ok(tutorial)
    }

    async fn update_tutorial(
        &self,
        id: &ContentId,
        patch: TutorialPatch,
    ) -> Result<Tutorial, StoreError> {
        let mut body = serde_json::to_value(&patch)?;
        body["updated_at"] = serde_json::to_value(Utc::now())?;

        let mut rows: Vec<Tutorial> = self
            .update(TABLE_TUTORIALS, &Self::id_filter(id), &body)
            .await?;
        if rows.is_empty() {
            return Err(StoreError::NoSuchRecord(id.to_string()));
        }
        Ok(rows.swap_remove(0))
    }

    async fn delete_tutorial(&self, id: &ContentId) -> Result<(), StoreError> {
        if self.delete(TABLE_TUTORIALS, &Self::id_filter(id)).await? == 0 {
            return Err(StoreError::NoSuchRecord(id.to_string()));
        }
        Ok(())
    }

    async fn find_tutorial(&self, id: &ContentId) -> Result<Option<Tutorial>, StoreError> {
        let mut rows: Vec<Tutorial> = self.select(TABLE_TUTORIALS, &Self::id_filter(id)).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    async fn list_tutorials(&self, category: &str) -> Result<Vec<Tutorial>, StoreError> {
        self.select(
            TABLE_TUTORIALS,
            &[
                ("category", format!("eq.{}", category)),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    async fn add_featured(&self, item: FeaturedItem) -> Result<FeaturedItem, StoreError> {
        self.insert(TABLE_FEATURED, &item).await?;
        Ok(item)
    }

    async fn remove_featured(&self, id: &ContentId) -> Result<(), StoreError> {
        if self.delete(TABLE_FEATURED, &Self::id_filter(id)).await? == 0 {
            return Err(StoreError::NoSuchRecord(id.to_string()));
        }
        Ok(())
    }

    async fn list_featured(&self) -> Result<Vec<FeaturedItem>, StoreError> {
        self.select(
            TABLE_FEATURED,
            &[("order", "created_at.desc".to_string())],
        )
        .await
    }
}
