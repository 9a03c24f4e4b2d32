// Async HTTP client for the newscast REST API.
//
// Base path: configurable, default http://localhost:8000/api/v1/
// Auth: none

use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::decode::decode_each;
use crate::types::{
    Acknowledgement, BroadcastLogResponse, BroadcastRequestBody, BroadcastResponse,
    FavoriteCreate, FavoriteResponse, NewsPageResponse, RawNewsPage, RefreshResponse,
};
use crate::{Error, TransportConfig};

// ── Error response shape (FastAPI) ───────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorResponse {
    /// Flatten `detail` into a message and, for 422 bodies, the offending field.
    fn into_parts(self) -> (Option<String>, Option<String>) {
        match self.detail {
            Some(Value::String(s)) => (Some(s), None),
            Some(Value::Array(items)) => {
                let first = items.into_iter().next();
                let message = first
                    .as_ref()
                    .and_then(|v| v.get("msg"))
                    .and_then(Value::as_str)
                    .map(str::to_owned);
                let field = first
                    .as_ref()
                    .and_then(|v| v.get("loc"))
                    .and_then(Value::as_array)
                    .and_then(|loc| loc.last())
                    .and_then(Value::as_str)
                    .map(str::to_owned);
                (message.or(self.message), field)
            }
            Some(other) => (Some(other.to_string()), None),
            None => (self.message, None),
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the newscast REST API.
///
/// Translates logical operations (list news, manage favorites, broadcast)
/// into JSON requests against a versioned base path. Never retries: the
/// non-idempotent operations (`add_favorite`, `broadcast`) are sent exactly
/// once per call.
#[derive(Debug, Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl NewsClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` using the given transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base path ends with `/` so relative joins append to it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn post_empty<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).send().await?;
        self.handle_ack(resp).await
    }

    async fn delete<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_ack(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            decode_body(body)
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    /// Like `handle_response`, but an empty 2xx body decodes to `T::default()`.
    async fn handle_ack<T: DeserializeOwned + Default>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            if body.trim().is_empty() {
                return Ok(T::default());
            }
            decode_body(body)
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let (message, field) = match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(err) => err.into_parts(),
            Err(_) => (None, None),
        };
        let message = message.unwrap_or_else(|| {
            if raw.is_empty() {
                status.to_string()
            } else {
                raw
            }
        });

        classify_status(status, message, field)
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── News ─────────────────────────────────────────────────────────

    /// One page of the news feed. Malformed items are quarantined.
    pub async fn list_news(&self, page: u32, limit: u32) -> Result<NewsPageResponse, Error> {
        let raw: RawNewsPage = self
            .get_with_params(
                "news",
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        let (items, rejected) = decode_each(raw.items, "news item");
        Ok(NewsPageResponse {
            items,
            total: raw.total,
            page: raw.page,
            limit: raw.limit,
            rejected,
        })
    }

    /// Trigger server-side re-ingestion. Returns no items.
    pub async fn refresh_news(&self) -> Result<RefreshResponse, Error> {
        self.post_empty("news/refresh").await
    }

    // ── Favorites ────────────────────────────────────────────────────

    pub async fn list_favorites(&self) -> Result<Vec<FavoriteResponse>, Error> {
        let raw: Vec<Value> = self.get("favorites").await?;
        let (favorites, rejected) = decode_each(raw, "favorite");
        if rejected > 0 {
            warn!(rejected, "favorites list contained malformed entries");
        }
        Ok(favorites)
    }

    /// Not idempotent: a second call for the same item yields `Error::Conflict`.
    pub async fn add_favorite(&self, news_item_id: i64) -> Result<FavoriteResponse, Error> {
        self.post("favorites", &FavoriteCreate { news_item_id })
            .await
    }

    pub async fn remove_favorite(&self, favorite_id: i64) -> Result<Acknowledgement, Error> {
        self.delete(&format!("favorites/{favorite_id}")).await
    }

    // ── Broadcast ────────────────────────────────────────────────────

    /// Not idempotent: every call may deliver once more.
    pub async fn broadcast(&self, body: &BroadcastRequestBody) -> Result<BroadcastResponse, Error> {
        self.post("broadcast", body).await
    }

    pub async fn list_broadcast_logs(&self) -> Result<Vec<BroadcastLogResponse>, Error> {
        let raw: Vec<Value> = self.get("broadcast/logs").await?;
        let (logs, rejected) = decode_each(raw, "broadcast log");
        if rejected > 0 {
            warn!(rejected, "broadcast log list contained malformed entries");
        }
        Ok(logs)
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn decode_body<T: DeserializeOwned>(body: String) -> Result<T, Error> {
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

/// Map a non-2xx status and its message onto the error taxonomy.
fn classify_status(status: StatusCode, message: String, field: Option<String>) -> Error {
    match status {
        StatusCode::NOT_FOUND => Error::NotFound { message },
        StatusCode::CONFLICT => Error::Conflict { message },
        StatusCode::BAD_REQUEST if message.to_lowercase().contains("already") => {
            Error::Conflict { message }
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Error::Rejected {
            field: field.unwrap_or_else(|| "request".into()),
            message,
        },
        other => Error::Status {
            status: other.as_u16(),
            message,
        },
    }
}
