use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{debug, info};
use url::Url;

use crate::types::{ApiError, ContentItem, ItemsPage};

/// Parameters of one "all items of a type" listing. Depth is always 0.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemsQuery {
    pub language: String,
    pub content_type: String,
    pub elements: Vec<String>,
    pub page_size: u32,
}

/// Something that can produce the complete, unpaginated item list for a query.
#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch_all(&self, query: &ItemsQuery) -> Result<Vec<ContentItem>>;
}

/// Read-only client for the Delivery API of one project.
pub struct DeliveryClient {
    http: reqwest::Client,
    base_url: Url,
    project_id: String,
}

impl DeliveryClient {
    pub fn new(base_url: &str, project_id: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("kontent-csv/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = Url::parse(base_url).with_context(|| format!("invalid base url: {base_url}"))?;
        Ok(Self { http, base_url, project_id: project_id.to_string() })
    }

    /// URL of the first page.
    pub fn items_url(&self, query: &ItemsQuery) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("base url cannot have path segments: {}", self.base_url))?
            .pop_if_empty()
            .push(&self.project_id)
            .push("items");
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("system.type", &query.content_type);
            q.append_pair("language", &query.language);
            if !query.elements.is_empty() {
                q.append_pair("elements", &query.elements.join(","));
            }
            q.append_pair("depth", "0");
            q.append_pair("limit", &query.page_size.to_string());
            q.append_pair("skip", "0");
        }
        Ok(url)
    }

    async fn fetch_page(&self, url: &Url) -> Result<ItemsPage> {
        debug!(%url, "requesting page");
        let resp = self.http.get(url.clone()).send().await.with_context(|| format!("request to {url} failed"))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            match serde_json::from_str::<ApiError>(&body) {
                Ok(err) => bail!(
                    "Delivery API returned {status}: {} (error_code {}, request_id {})",
                    err.message,
                    err.error_code.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
                    err.request_id.as_deref().unwrap_or("-")
                ),
                Err(_) => bail!("Delivery API returned {status} for {url}"),
            }
        }
        resp.json::<ItemsPage>().await.with_context(|| format!("failed to decode items page from {url}"))
    }

    fn next_url(&self, next_page: Option<&str>) -> Result<Option<Url>> {
        match next_page.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(next) => {
                let url = Url::parse(next)
                    .or_else(|_| self.base_url.join(next))
                    .with_context(|| format!("invalid next_page url: {next}"))?;
                Ok(Some(url))
            }
        }
    }
}

#[async_trait]
impl ItemSource for DeliveryClient {
    async fn fetch_all(&self, query: &ItemsQuery) -> Result<Vec<ContentItem>> {
        let mut items = Vec::new();
        let mut url = self.items_url(query)?;
        let mut visited = HashSet::new();
        loop {
            visited.insert(url.clone());
            let page = self.fetch_page(&url).await?;
            let p = &page.pagination;
            debug!(skip = p.skip, limit = p.limit, count = p.count, "page received");
            info!("Fetched '{}' items from API", page.items.len());
            items.extend(page.items);
            match self.next_url(page.pagination.next_page.as_deref())? {
                Some(next) if visited.contains(&next) => bail!("Delivery API paging revisits {next}"),
                Some(next) => url = next,
                None => break,
            }
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn query() -> ItemsQuery {
        ItemsQuery {
            language: "global".into(),
            content_type: "product".into(),
            elements: vec!["basemodeloverview".into(), "desc".into()],
            page_size: 2,
        }
    }

    fn item_json(codename: &str) -> serde_json::Value {
        json!({
            "system": { "id": format!("id-{codename}"), "name": codename, "codename": codename,
                        "language": "global", "type": "product", "last_modified": "2024-01-01T00:00:00Z" },
            "elements": { "basemodeloverview": { "type": "rich_text", "name": "Overview", "value": "<p>x</p>" } }
        })
    }

    #[test]
    fn first_page_url_carries_query() {
        let client = DeliveryClient::new("https://deliver.kontent.ai", "proj").unwrap();
        let url = client.items_url(&query()).unwrap();
        assert_eq!(url.path(), "/proj/items");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("system.type".into(), "product".into())));
        assert!(pairs.contains(&("elements".into(), "basemodeloverview,desc".into())));
        assert!(pairs.contains(&("depth".into(), "0".into())));
        assert!(pairs.contains(&("limit".into(), "2".into())));
    }

    #[tokio::test]
    async fn follows_next_page_until_empty() {
        let server = MockServer::start().await;
        let next = format!("{}/proj/items?system.type=product&depth=0&limit=2&skip=2", server.uri());
        Mock::given(method("GET"))
            .and(path("/proj/items"))
            .and(query_param("skip", "0"))
            .and(query_param("depth", "0"))
            .and(query_param("elements", "basemodeloverview,desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [item_json("a"), item_json("b")],
                "modular_content": {},
                "pagination": { "skip": 0, "limit": 2, "count": 2, "next_page": next }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/proj/items"))
            .and(query_param("skip", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [item_json("c")],
                "modular_content": {},
                "pagination": { "skip": 2, "limit": 2, "count": 1, "next_page": "" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = DeliveryClient::new(&server.uri(), "proj").unwrap();
        let items = client.fetch_all(&query()).await.unwrap();
        let codenames: Vec<_> = items.iter().map(|i| i.system.codename.as_str()).collect();
        assert_eq!(codenames, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn paging_cycle_is_fatal() {
        let server = MockServer::start().await;
        let client = DeliveryClient::new(&server.uri(), "proj").unwrap();
        let first = client.items_url(&query()).unwrap().to_string();
        let second = format!("{}/proj/items?system.type=product&depth=0&limit=2&skip=2", server.uri());
        Mock::given(method("GET"))
            .and(path("/proj/items"))
            .and(query_param("skip", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [item_json("a")],
                "pagination": { "skip": 0, "limit": 2, "count": 1, "next_page": second }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/proj/items"))
            .and(query_param("skip", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [item_json("b")],
                "pagination": { "skip": 2, "limit": 2, "count": 1, "next_page": first }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client.fetch_all(&query()).await.unwrap_err().to_string();
        assert!(err.contains("revisits"), "{err}");
    }

    #[tokio::test]
    async fn api_error_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/proj/items"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "The requested project was not found.",
                "request_id": "abc",
                "error_code": 105,
                "specific_code": 0
            })))
            .mount(&server)
            .await;

        let client = DeliveryClient::new(&server.uri(), "proj").unwrap();
        let err = client.fetch_all(&query()).await.unwrap_err().to_string();
        assert!(err.contains("404"), "{err}");
        assert!(err.contains("project was not found"), "{err}");
    }

    #[tokio::test]
    async fn undecodable_body_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/proj/items"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let client = DeliveryClient::new(&server.uri(), "proj").unwrap();
        assert!(client.fetch_all(&query()).await.is_err());
    }
}
