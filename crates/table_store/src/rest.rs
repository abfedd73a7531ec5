//! REST client for a hosted table store speaking the PostgREST dialect.

use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use shared::error::{StoreError, StoreResult};
use tracing::debug;
use url::Url;

use crate::{Filter, Order, TableStore};

pub struct RestTableStore {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestTableStore {
    /// `base_url` is the REST root; table names are appended as one path
    /// segment each.
    pub fn new(base_url: impl AsRef<str>) -> StoreResult<Self> {
        let raw = base_url.as_ref();
        let parsed = Url::parse(raw)
            .map_err(|err| StoreError::message(format!("invalid base url {raw}: {err}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StoreError::message(format!(
                "base url must be http or https, got {raw}"
            )));
        }
        Ok(Self {
            http: Client::new(),
            base_url: raw.trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    /// Attach the project api key, sent both as the `apikey` header and as
    /// a bearer token, matching the hosted service's anonymous-role setup.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, format!("{}/{table}", self.base_url));
        if let Some(api_key) = &self.api_key {
            request = request.header("apikey", api_key).bearer_auth(api_key);
        }
        request
    }
}

#[async_trait]
impl TableStore for RestTableStore {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<Order>,
    ) -> StoreResult<Vec<Value>> {
        let mut query: Vec<(String, String)> = vec![("select".into(), "*".into())];
        query.extend(filters.iter().map(Filter::to_query_pair));
        if let Some(order) = order {
            query.push(("order".into(), order.to_query_value()));
        }

        let response = self
            .request(Method::GET, table)
            .query(&query)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|err| StoreError::message(format!("invalid rows payload from {table}: {err}")))
    }

    async fn insert(&self, table: &str, row: Value) -> StoreResult<Value> {
        let response = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, "application/vnd.pgrst.object+json")
            .json(&row)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        debug!(table, "rest: row inserted");
        response.json().await.map_err(|err| {
            StoreError::message(format!("invalid inserted-row payload from {table}: {err}"))
        })
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> StoreResult<()> {
        if filters.is_empty() {
            return Err(StoreError::message(format!(
                "refusing to delete from {table} without a filter"
            )));
        }
        let query: Vec<(String, String)> = filters.iter().map(Filter::to_query_pair).collect();
        let response = self
            .request(Method::DELETE, table)
            .query(&query)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await?;
        debug!(table, "rest: rows deleted");
        Ok(())
    }

    async fn count(&self, table: &str, filters: &[Filter]) -> StoreResult<u64> {
        let query: Vec<(String, String)> = filters.iter().map(Filter::to_query_pair).collect();
        let response = self
            .request(Method::HEAD, table)
            .header("Prefer", "count=exact")
            .query(&query)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;

        let content_range = response
            .headers()
            .get(header::CONTENT_RANGE)
            .ok_or_else(|| {
                StoreError::message(format!("missing content-range in count response for {table}"))
            })?
            .to_str()
            .map_err(|_| {
                StoreError::message(format!("unreadable content-range for {table}"))
            })?;

        content_range
            .rsplit('/')
            .next()
            .and_then(|total| total.parse::<u64>().ok())
            .ok_or_else(|| {
                StoreError::message(format!(
                    "unparseable content-range '{content_range}' for {table}"
                ))
            })
    }
}

async fn check_status(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(parse_error_body(status, &body))
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

fn parse_error_body(status: StatusCode, body: &str) -> StoreError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => StoreError {
            code: parsed.code,
            message: parsed
                .message
                .unwrap_or_else(|| format!("request failed with status {status}")),
        },
        Err(_) => StoreError::message(format!("request failed with status {status}: {body}")),
    }
}

fn transport_error(err: reqwest::Error) -> StoreError {
    StoreError::message(format!("transport failure: {err}"))
}
