use std::path::Path;

use async_trait::async_trait;
use jyut_config::retrieval::RetrievalConfig;
use jyut_config::vertex::VertexConfig;
use jyut_core::dictionary::{RetrieveError, RetrievedContext, Retriever};
use serde::Deserialize;
use serde_json::json;

use crate::RagError;

/// Vertex AI RAG Engine REST client
#[derive(Clone)]
pub struct RagClient {
    client: reqwest::Client,
    vertex: VertexConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Corpus {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RagFile {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListCorporaResponse {
    #[serde(default)]
    rag_corpora: Vec<Corpus>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RetrieveContextsResponse {
    #[serde(default)]
    contexts: Option<ContextList>,
}

#[derive(Debug, Deserialize)]
struct ContextList {
    #[serde(default)]
    contexts: Vec<ContextJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContextJson {
    #[serde(default)]
    text: String,
    source_uri: Option<String>,
    distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    rag_file: Option<RagFile>,
    error: Option<serde_json::Value>,
}

impl RagClient {
    pub fn new(client: reqwest::Client, vertex: VertexConfig) -> Self {
        Self { client, vertex }
    }

    fn base_url(&self) -> String {
        format!("{}/v1beta1", self.vertex.api_host(&self.vertex.location))
    }

    /// List every corpus in the configured project and location
    pub async fn list_corpora(&self) -> Result<Vec<Corpus>, RagError> {
        let url = format!("{}/{}/ragCorpora", self.base_url(), self.vertex.parent());
        let mut corpora = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.client.get(&url).bearer_auth(&self.vertex.access_token);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = check(request.send().await?).await?;
            let page: ListCorporaResponse = response.json().await?;
            corpora.extend(page.rag_corpora);

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(corpora)
    }

    /// Corpus resource name to use: the one matching `display_name`, or the first one listed
    pub async fn resolve_corpus(&self, display_name: &str) -> Result<String, RagError> {
        let corpora = self.list_corpora().await?;
        select_corpus(&corpora, display_name).map(|c| c.name.clone())
    }

    /// Ranked contexts for `text` from `corpus`
    pub async fn retrieve_contexts(
        &self,
        corpus: &str,
        text: &str,
        retrieval: &RetrievalConfig,
    ) -> Result<Vec<RetrievedContext>, RagError> {
        let url = format!("{}/{}:retrieveContexts", self.base_url(), self.vertex.parent());
        let body = json!({
            "vertex_rag_store": {
                "rag_resources": [{ "rag_corpus": corpus }],
                "vector_distance_threshold": retrieval.vector_distance_threshold,
            },
            "query": {
                "text": text,
                "similarity_top_k": retrieval.similarity_top_k,
            },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.vertex.access_token)
            .json(&body)
            .send()
            .await?;

        let json: serde_json::Value = check(response).await?.json().await?;
        Ok(parse_contexts(json)?)
    }

    /// Upload one local file into `corpus`
    pub async fn upload_file(
        &self,
        corpus: &str,
        path: &Path,
        display_name: &str,
        description: &str,
    ) -> Result<RagFile, RagError> {
        let url = format!(
            "{}/upload/v1beta1/{}/ragFiles:upload",
            self.vertex.api_host(&self.vertex.location),
            corpus
        );

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| display_name.to_string());

        let metadata = json!({
            "rag_file": {
                "display_name": display_name,
                "description": description,
            }
        });

        let form = reqwest::multipart::Form::new()
            .part(
                "metadata",
                reqwest::multipart::Part::text(metadata.to_string())
                    .mime_str("application/json")?,
            )
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str("text/plain")?,
            );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.vertex.access_token)
            .header("X-Goog-Upload-Protocol", "multipart")
            .multipart(form)
            .send()
            .await?;

        let upload: UploadResponse = check(response).await?.json().await?;
        if let Some(error) = upload.error {
            return Err(RagError::Api {
                status: 200,
                message: error.to_string(),
            });
        }

        upload.rag_file.ok_or_else(|| RagError::Api {
            status: 200,
            message: "upload response carried no ragFile".to_string(),
        })
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, RagError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(RagError::RateLimited);
    }

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(RagError::Authentication);
    }

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(RagError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}

fn select_corpus<'a>(corpora: &'a [Corpus], display_name: &str) -> Result<&'a Corpus, RagError> {
    if !display_name.is_empty() {
        return corpora
            .iter()
            .find(|c| c.display_name == display_name)
            .ok_or_else(|| RagError::NoCorpus(Some(display_name.to_string())));
    }

    let first = corpora.first().ok_or(RagError::NoCorpus(None))?;
    if corpora.len() > 1 {
        tracing::warn!("Multiple RAG corpora found. Using the first one: {}", first.name);
    }
    Ok(first)
}

fn parse_contexts(json: serde_json::Value) -> Result<Vec<RetrievedContext>, serde_json::Error> {
    let response: RetrieveContextsResponse = serde_json::from_value(json)?;

    Ok(response
        .contexts
        .map(|list| list.contexts)
        .unwrap_or_default()
        .into_iter()
        .map(|c| RetrievedContext {
            text: c.text,
            source_uri: c.source_uri,
            distance: c.distance,
        })
        .collect())
}

/// A [`Retriever`] bound to one corpus
#[derive(Clone)]
pub struct CorpusRetriever {
    client: RagClient,
    corpus: String,
    retrieval: RetrievalConfig,
}

impl CorpusRetriever {
    pub fn new(client: RagClient, corpus: String, retrieval: RetrievalConfig) -> Self {
        Self {
            client,
            corpus,
            retrieval,
        }
    }

    pub fn corpus(&self) -> &str {
        &self.corpus
    }
}

#[async_trait]
impl Retriever for CorpusRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedContext>, RetrieveError> {
        self.client
            .retrieve_contexts(&self.corpus, query, &self.retrieval)
            .await
            .map_err(|e| RetrieveError::Backend(e.to_string()))
    }
}
