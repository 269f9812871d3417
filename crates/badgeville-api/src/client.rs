// Berlin API HTTP client
//
// Wraps `reqwest::Client` with Berlin URL construction, root-key request
// bodies, `{data, paging}` envelope unwrapping, and translation of error
// bodies into `Error::Validation`. Every endpoint is a generic verb over a
// `Resource`; there is no per-entity logic here.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;
use crate::model::EntityId;
use crate::query::Query;
use crate::resource::Resource;
use crate::transport::TransportConfig;
use crate::validation::ValidationErrors;

/// Path segment between the host and the API key.
const API_PREFIX: &str = "api/berlin";

/// Stand-in for the API key in logged URLs.
const REDACTED: &str = "***";

// ── Wire envelopes ───────────────────────────────────────────────────

/// Paging block accompanying collection responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub per_page: u32,
}

/// One page of a collection listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub paging: Option<Paging>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Option<ValidationErrors>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Request body wrapped in the resource's singular root key.
struct Rooted<'a, T> {
    root: &'static str,
    resource: &'a T,
}

impl<T: Serialize> Serialize for Rooted<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.root, self.resource)?;
        map.end()
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Badgeville Berlin REST API.
///
/// The API key is part of every request path
/// (`{host}/api/berlin/{api_key}/{collection}.json`), so it is held as a
/// secret and replaced by `***` in every log line and error.
pub struct BerlinClient {
    http: reqwest::Client,
    host: Url,
    base_url: Url,
    api_key: SecretString,
    timeout_secs: u64,
}

impl std::fmt::Debug for BerlinClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BerlinClient")
            .field("host", &self.host.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl BerlinClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `host` (e.g. `http://staging.badgeville.com`).
    pub fn new(
        host: &str,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let mut client = Self::with_client(http, host, api_key)?;
        client.timeout_secs = transport.timeout.as_secs();
        Ok(client)
    }

    /// Wrap an existing `reqwest::Client` (caller manages TLS and timeouts).
    pub fn with_client(
        http: reqwest::Client,
        host: &str,
        api_key: &SecretString,
    ) -> Result<Self, Error> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(Error::Authentication {
                message: "no API key configured".into(),
            });
        }

        let host = Self::normalize_host(host)?;
        let base_url = host.join(&format!("{API_PREFIX}/{}/", api_key.expose_secret()))?;

        Ok(Self {
            http,
            host,
            base_url,
            api_key: api_key.clone(),
            timeout_secs: TransportConfig::default().timeout.as_secs(),
        })
    }

    /// Parse the host and make sure its path ends with `/` so joins append.
    fn normalize_host(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        url.set_query(None);
        Ok(url)
    }

    /// The configured host, without the API key.
    pub fn host(&self) -> &Url {
        &self.host
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn collection_url<T: Resource>(&self) -> Result<Url, Error> {
        Ok(self
            .base_url
            .join(&format!("{}.json", T::KIND.collection()))?)
    }

    fn member_url<T: Resource>(&self, id: &EntityId) -> Result<Url, Error> {
        Ok(self
            .base_url
            .join(&format!("{}/{id}.json", T::KIND.collection()))?)
    }

    /// Render a request URL for logs and errors with the API key masked.
    fn redact(&self, url: &Url) -> String {
        url.as_str().replace(
            &format!("/{API_PREFIX}/{}/", self.api_key.expose_secret()),
            &format!("/{API_PREFIX}/{REDACTED}/"),
        )
    }

    /// Collection-relative path used to label not-found errors.
    fn resource_label(&self, url: &Url) -> String {
        let full = url.as_str();
        full.strip_prefix(self.base_url.as_str())
            .unwrap_or(full)
            .trim_end_matches(".json")
            .to_owned()
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// `POST /{collection}.json` -- returns the server's representation,
    /// including the assigned `id`.
    pub async fn create<T: Resource>(&self, resource: &T) -> Result<T, Error> {
        let url = self.collection_url::<T>()?;
        debug!("POST {}", self.redact(&url));

        let body = Rooted {
            root: T::KIND.element(),
            resource,
        };
        let builder = self.http.post(url.clone()).json(&body);
        let resp = self.send(builder).await?;
        self.handle_response(&url, resp).await.map(|(data, _)| data)
    }

    /// `PUT /{collection}/{id}.json`.
    pub async fn update<T: Resource>(&self, id: &EntityId, resource: &T) -> Result<T, Error> {
        let url = self.member_url::<T>(id)?;
        debug!("PUT {}", self.redact(&url));

        let body = Rooted {
            root: T::KIND.element(),
            resource,
        };
        let builder = self.http.put(url.clone()).json(&body);
        let resp = self.send(builder).await?;
        self.handle_response(&url, resp).await.map(|(data, _)| data)
    }

    /// `GET /{collection}/{id}.json`.
    pub async fn get<T: Resource>(&self, id: &EntityId) -> Result<T, Error> {
        let url = self.member_url::<T>(id)?;
        debug!("GET {}", self.redact(&url));

        let resp = self.send(self.http.get(url.clone())).await?;
        self.handle_response(&url, resp).await.map(|(data, _)| data)
    }

    /// `GET /{collection}.json?{query}` -- all entries of one page, in
    /// server order.
    pub async fn list<T: Resource>(&self, query: &Query) -> Result<Vec<T>, Error> {
        self.list_page(query).await.map(|page| page.data)
    }

    /// Like [`list`](Self::list), keeping the paging block.
    pub async fn list_page<T: Resource>(&self, query: &Query) -> Result<Page<T>, Error> {
        let url = self.collection_url::<T>()?;
        debug!("GET {} params={:?}", self.redact(&url), query.params());

        let resp = self
            .send(self.http.get(url.clone()).query(query.params()))
            .await?;
        let (data, paging) = self.handle_response(&url, resp).await?;
        Ok(Page { data, paging })
    }

    /// `DELETE /{collection}/{id}.json`.
    pub async fn delete<T: Resource>(&self, id: &EntityId) -> Result<(), Error> {
        let url = self.member_url::<T>(id)?;
        debug!("DELETE {}", self.redact(&url));

        let resp = self.send(self.http.delete(url.clone())).await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(&url, status, resp).await)
        }
    }

    // ── Response handling ────────────────────────────────────────────

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        builder.send().await.map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err.without_url())
        }
    }

    async fn handle_response<D: DeserializeOwned>(
        &self,
        url: &Url,
        resp: reqwest::Response,
    ) -> Result<(D, Option<Paging>), Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(url, status, resp).await);
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        trace!(status = status.as_u16(), len = body.len(), "response body received");

        let value: Value = serde_json::from_str(&body).map_err(|e| decode_error(&e, &body))?;
        let (payload, paging) = split_envelope(value);

        let data = serde_json::from_value::<D>(payload).map_err(|e| decode_error(&e, &body))?;
        let paging = paging
            .filter(|p| !p.is_null())
            .map(serde_json::from_value::<Paging>)
            .transpose()
            .map_err(|e| decode_error(&e, &body))?;
        Ok((data, paging))
    }

    async fn parse_error(
        &self,
        url: &Url,
        status: reqwest::StatusCode,
        resp: reqwest::Response,
    ) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Error::Authentication {
                message: format!("API key rejected (HTTP {})", status.as_u16()),
            };
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Error::NotFound {
                resource: self.resource_label(url),
            };
        }

        let raw = resp.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ErrorBody>(&raw).ok();

        match parsed {
            Some(ErrorBody {
                errors: Some(errors),
                ..
            }) if status.is_client_error() && !errors.is_empty() => {
                warn!(
                    url = %self.redact(url),
                    status = status.as_u16(),
                    %errors,
                    "server rejected payload"
                );
                Error::Validation(errors)
            }
            // Field errors on a server fault are still a server fault.
            Some(ErrorBody {
                errors: Some(errors),
                ..
            }) if !errors.is_empty() => Error::Api {
                status: status.as_u16(),
                message: errors.to_string(),
            },
            Some(ErrorBody { error, message, .. }) if error.is_some() || message.is_some() => {
                Error::Api {
                    status: status.as_u16(),
                    message: error.or(message).unwrap_or_default(),
                }
            }
            _ => Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    preview(&raw).to_owned()
                },
            },
        }
    }
}

/// Responses arrive as `{"data": ..., "paging": ...}` or as the bare
/// payload. A present `data` key always wins, so a `data` that does not
/// decode is an error rather than a bare entity with unknown fields.
fn split_envelope(value: Value) -> (Value, Option<Value>) {
    match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => (data, map.remove("paging")),
            None => (Value::Object(map), None),
        },
        bare => (bare, None),
    }
}

fn decode_error(err: &serde_json::Error, body: &str) -> Error {
    Error::Deserialization {
        message: format!("{err} (body preview: {:?})", preview(body)),
        body: body.to_owned(),
    }
}

/// First 200 characters of a body, cut on a char boundary.
fn preview(body: &str) -> &str {
    body.char_indices()
        .nth(200)
        .map_or(body, |(idx, _)| &body[..idx])
}
