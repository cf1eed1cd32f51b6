//! 文献检索服务 - 业务能力层
//!
//! 只负责"查询字符串 → 文献记录列表"，后端为 DBLP 公开检索接口

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::models::Publication;

const SERVICE: &str = "dblp";

/// 文献检索后端
#[async_trait]
pub trait LiteratureSearch: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> PipelineResult<Vec<Publication>>;
}

/// DBLP 检索服务
pub struct SearchService {
    client: Client,
    base_url: String,
}

impl SearchService {
    pub fn new(config: &Config) -> PipelineResult<Self> {
        let client = Client::builder()
            .timeout(config.fetch_timeout())
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PipelineError::external_service(SERVICE, e))?;

        Ok(Self {
            client,
            base_url: config.search_api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/search/publ/api", self.base_url)
    }
}

#[async_trait]
impl LiteratureSearch for SearchService {
    async fn search(&self, query: &str, limit: usize) -> PipelineResult<Vec<Publication>> {
        info!("🔍 检索文献: \"{}\" (最多 {} 条)", query, limit);

        let limit = limit.to_string();
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("q", query), ("format", "json"), ("h", limit.as_str())])
            .send()
            .await
            .map_err(|e| PipelineError::external_service(SERVICE, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::external_service(
                SERVICE,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::external_service(SERVICE, format!("响应格式错误: {}", e)))?;

        let publications: Vec<Publication> = body
            .result
            .hits
            .hit
            .into_iter()
            .map(|hit| hit.info.into_publication())
            .collect();

        debug!("检索返回 {} 条记录", publications.len());
        Ok(publications)
    }
}

// ========== DBLP 响应结构 ==========

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    #[serde(default)]
    hit: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    info: HitInfo,
}

#[derive(Debug, Deserialize)]
struct HitInfo {
    title: String,
    #[serde(default)]
    authors: Option<Authors>,
    #[serde(default)]
    venue: Option<OneOrMany<String>>,
    #[serde(default)]
    year: Option<String>,
    /// 有多个电子版本时是数组
    #[serde(default)]
    ee: Option<OneOrMany<String>>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Authors {
    author: OneOrMany<Author>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(list) => list,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Author {
    text: String,
}

impl HitInfo {
    fn into_publication(self) -> Publication {
        let authors: Vec<String> = self
            .authors
            .map(|a| a.author.into_vec().into_iter().map(|author| author.text).collect())
            .unwrap_or_default();
        let venue = self
            .venue
            .map(|v| v.into_vec().join(", "))
            .filter(|v| !v.is_empty());
        let ee = self
            .ee
            .and_then(|ee| ee.into_vec().into_iter().find(|link| !link.trim().is_empty()));

        Publication {
            title: self.title.trim().trim_end_matches('.').to_string(),
            authors,
            year: self.year,
            venue,
            citations: None,
            url: ee.or(self.url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_for(server: &MockServer) -> SearchService {
        let config = Config {
            search_api_base_url: server.uri(),
            ..Config::default()
        };
        SearchService::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_search_maps_hits() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "result": { "hits": { "hit": [
                { "info": {
                    "title": "Attention Is All You Need.",
                    "authors": { "author": [ { "text": "Ashish Vaswani" }, { "text": "Noam Shazeer" } ] },
                    "venue": "NIPS", "year": "2017",
                    "ee": "https://example.org/attention.pdf",
                    "url": "https://dblp.org/rec/conf/nips/VaswaniSPUJGKP17"
                } },
                { "info": {
                    "title": "Solo Work.",
                    "authors": { "author": { "text": "Only Author" } },
                    "url": "https://dblp.org/rec/solo"
                } }
            ] } }
        });

        Mock::given(method("GET"))
            .and(path("/search/publ/api"))
            .and(query_param("q", "transformers"))
            .and(query_param("format", "json"))
            .and(query_param("h", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let results = service_for(&server).search("transformers", 2).await.unwrap();
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].title, "Attention Is All You Need");
        assert_eq!(results[0].authors_display(), "Ashish Vaswani, Noam Shazeer");
        assert_eq!(results[0].year.as_deref(), Some("2017"));
        assert_eq!(results[0].url.as_deref(), Some("https://example.org/attention.pdf"));

        assert_eq!(results[1].authors, vec!["Only Author".to_string()]);
        assert_eq!(results[1].url.as_deref(), Some("https://dblp.org/rec/solo"));
    }

    #[tokio::test]
    async fn test_search_accepts_multiple_editions() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "result": { "hits": { "hit": [
                { "info": {
                    "title": "Two Editions.",
                    "authors": { "author": { "text": "Some One" } },
                    "venue": ["CoRR", "ICLR"],
                    "ee": ["https://doi.org/10.1/x", "https://arxiv.org/abs/1"],
                    "url": "https://dblp.org/rec/two"
                } },
                { "info": {
                    "title": "One Edition.",
                    "venue": "NIPS",
                    "ee": "https://example.org/one.pdf"
                } }
            ] } }
        });
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let results = service_for(&server).search("editions", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url.as_deref(), Some("https://doi.org/10.1/x"));
        assert_eq!(results[0].venue.as_deref(), Some("CoRR, ICLR"));
        assert_eq!(results[1].url.as_deref(), Some("https://example.org/one.pdf"));
        assert_eq!(results[1].venue.as_deref(), Some("NIPS"));
        assert!(results[1].authors.is_empty());
    }

    #[tokio::test]
    async fn test_search_without_hits_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "result": { "hits": { "@total": "0" } } })),
            )
            .mount(&server)
            .await;

        let results = service_for(&server).search("nothing", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_server_error_is_external_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = service_for(&server).search("x", 1).await.unwrap_err();
        assert!(matches!(err, PipelineError::ExternalService { .. }));
    }

    #[tokio::test]
    async fn test_search_malformed_body_is_external_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = service_for(&server).search("x", 1).await.unwrap_err();
        assert!(matches!(err, PipelineError::ExternalService { .. }));
    }
}
