use anyhow::{Context, Result};
use jyut_config::store::StoreConfig;
use jyut_config::vertex::VertexConfig;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::value::Write;

const FIRESTORE_HOST: &str = "https://firestore.googleapis.com/v1";

#[derive(Clone)]
pub struct FirestoreClient {
    client: reqwest::Client,
    project_id: String,
    database: String,
    access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

impl FirestoreClient {
    pub fn new(client: reqwest::Client, vertex: &VertexConfig, store: &StoreConfig) -> Self {
        Self {
            client,
            project_id: vertex.project_id.clone(),
            database: store.database.clone(),
            access_token: vertex.access_token.clone(),
        }
    }

    /// `projects/{p}/databases/{db}/documents`
    pub fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database
        )
    }

    /// Full resource name for a document in `collection`
    pub fn document_name(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.documents_root(), collection, id)
    }

    /// Every document in `collection`, following page tokens
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let url = format!("{}/{}/{}", FIRESTORE_HOST, self.documents_root(), collection);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", "300".to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.access_token)
                .query(&query)
                .send()
                .await
                .context("Failed to send request to Firestore")?;

            let page: ListResponse = Self::read_json(response)
                .await
                .context("Failed to list Firestore documents")?;
            documents.extend(page.documents);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(documents)
    }

    /// Apply `writes` atomically. Callers keep batches within the 500 write limit.
    pub async fn commit(&self, writes: &[Write]) -> Result<()> {
        if writes.is_empty() {
            return Ok(());
        }

        let url = format!("{}/{}:commit", FIRESTORE_HOST, self.documents_root());
        let body = json!({
            "writes": writes.iter().map(Write::to_json).collect::<Vec<_>>(),
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Firestore")?;

        let _: Value = Self::read_json(response)
            .await
            .context("Firestore commit failed")?;

        Ok(())
    }

    /// Commit `writes` in chunks of `batch_size`
    pub async fn commit_batched(&self, writes: &[Write], batch_size: usize) -> Result<usize> {
        let mut committed = 0;

        for chunk in writes.chunks(batch_size.max(1)) {
            self.commit(chunk).await?;
            committed += chunk.len();
            tracing::info!("Committed {} writes", committed);
        }

        Ok(committed)
    }

    async fn read_json<T>(response: reqwest::Response) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Firestore error: HTTP {}: {}", status, body);
        }

        response
            .json::<T>()
            .await
            .context("Failed to parse Firestore response")
    }
}
