// Campaign service HTTP client
//
// Wraps `reqwest::Client` with service-specific URL construction,
// envelope unwrapping, and bearer-token auth. Endpoint methods stay
// thin; the `{"data": ...}` envelope is stripped before callers see it.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{
    ApiEnvelope, ApiErrorBody, CampaignDto, CampaignFilters, CampaignPatch, ContactDto,
    ContactImportReport, ContactPatch, CreateCampaignRequest, NewContact,
};
use crate::transport::TransportConfig;

/// Truncate a body for log/error messages without splitting a UTF-8
/// character (bodies are arbitrary bytes from the server).
fn body_preview(body: &str) -> &str {
    if body.len() <= 200 {
        return body;
    }
    let mut end = 200;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// HTTP client for the campaign service REST API.
///
/// Construct once with [`from_token`](Self::from_token) and share; the
/// underlying `reqwest::Client` pools connections internally.
pub struct CampaignClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CampaignClient {
    /// Create a client that authenticates with a bearer token.
    ///
    /// `base_url` is the service root (e.g. `https://api.example.com`);
    /// the `/api/...` path segments are appended per request.
    pub fn from_token(
        base_url: Url,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::Authentication {
                message: "token contains invalid header characters".into(),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Use this when auth headers are already configured on the client
    /// (and in tests, where no auth is needed).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the `{"data": ...}` envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        Self::parse_envelope(resp).await
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_envelope(resp).await
    }

    /// Send a PUT request with JSON body and unwrap the envelope.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PUT {}", url);
        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_envelope(resp).await
    }

    /// Send a DELETE request. The service returns an empty (or ignorable)
    /// body on success, so only the status is checked.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);
        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(Error::Transport)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        Err(Self::error_from_response(resp).await)
    }

    /// Parse the `{"data": ...}` envelope, returning `data` on success
    /// or a mapped error for non-2xx responses.
    async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::error_from_response(resp).await);
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let envelope: ApiEnvelope<T> = serde_json::from_str(&body).map_err(|e| {
            let preview = body_preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;
        Ok(envelope.data)
    }

    /// Map a non-2xx response to an `Error`, preferring the structured
    /// `{"error": {...}}` body when the service provides one.
    async fn error_from_response(resp: reqwest::Response) -> Error {
        let status = resp.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(1);
            return Error::RateLimited { retry_after_secs };
        }

        let body = resp.text().await.unwrap_or_default();
        let (message, code) = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(ApiErrorBody { error: Some(detail) }) => (
                detail.message.unwrap_or_else(|| format!("HTTP {status}")),
                detail.code,
            ),
            _ => (format!("HTTP {status}: {}", body_preview(&body)), None),
        };

        match status {
            reqwest::StatusCode::UNAUTHORIZED => Error::Authentication { message },
            reqwest::StatusCode::FORBIDDEN => Error::PermissionDenied { message },
            _ => Error::Service {
                message,
                code,
                status: status.as_u16(),
            },
        }
    }

    // ── Campaign endpoints ───────────────────────────────────────────

    /// `GET /api/campaigns` — list campaigns visible to the caller.
    pub async fn list_campaigns(
        &self,
        filters: Option<&CampaignFilters>,
    ) -> Result<Vec<CampaignDto>, Error> {
        let mut url = self.api_url("campaigns")?;
        if let Some(filters) = filters {
            let mut pairs = url.query_pairs_mut();
            if let Some(ref status) = filters.status {
                pairs.append_pair("status", status);
            }
            if let Some(ref kind) = filters.kind {
                pairs.append_pair("type", kind);
            }
            if let Some(ref search) = filters.search {
                pairs.append_pair("search", search);
            }
            drop(pairs);
        }
        self.get(url).await
    }

    /// `GET /api/campaigns/{id}`.
    pub async fn get_campaign(&self, id: &str) -> Result<CampaignDto, Error> {
        self.get(self.api_url(&format!("campaigns/{id}"))?).await
    }

    /// `POST /api/campaigns`.
    pub async fn create_campaign(
        &self,
        req: &CreateCampaignRequest,
    ) -> Result<CampaignDto, Error> {
        self.post(self.api_url("campaigns")?, req).await
    }

    /// `PUT /api/campaigns/{id}`.
    pub async fn update_campaign(
        &self,
        id: &str,
        patch: &CampaignPatch,
    ) -> Result<CampaignDto, Error> {
        self.put(self.api_url(&format!("campaigns/{id}"))?, patch)
            .await
    }

    /// `DELETE /api/campaigns/{id}`.
    pub async fn delete_campaign(&self, id: &str) -> Result<(), Error> {
        self.delete(self.api_url(&format!("campaigns/{id}"))?).await
    }

    // ── Campaign control actions ─────────────────────────────────────
    //
    // Each action returns the authoritative post-action campaign.

    /// `POST /api/campaigns/{id}/start`.
    pub async fn start_campaign(&self, id: &str) -> Result<CampaignDto, Error> {
        self.post(self.api_url(&format!("campaigns/{id}/start"))?, &())
            .await
    }

    /// `POST /api/campaigns/{id}/pause`.
    pub async fn pause_campaign(&self, id: &str) -> Result<CampaignDto, Error> {
        self.post(self.api_url(&format!("campaigns/{id}/pause"))?, &())
            .await
    }

    /// `POST /api/campaigns/{id}/stop`.
    pub async fn stop_campaign(&self, id: &str) -> Result<CampaignDto, Error> {
        self.post(self.api_url(&format!("campaigns/{id}/stop"))?, &())
            .await
    }

    /// `POST /api/campaigns/{id}/duplicate` — returns the new campaign.
    pub async fn duplicate_campaign(
        &self,
        id: &str,
        name: Option<&str>,
    ) -> Result<CampaignDto, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<&'a str>,
        }
        self.post(
            self.api_url(&format!("campaigns/{id}/duplicate"))?,
            &Body { name },
        )
        .await
    }

    // ── Contact endpoints ────────────────────────────────────────────

    /// `GET /api/campaigns/{id}/contacts`.
    pub async fn list_contacts(&self, campaign_id: &str) -> Result<Vec<ContactDto>, Error> {
        self.get(self.api_url(&format!("campaigns/{campaign_id}/contacts"))?)
            .await
    }

    /// `POST /api/campaigns/{id}/contacts` — bulk import.
    pub async fn add_contacts(
        &self,
        campaign_id: &str,
        contacts: &[NewContact],
    ) -> Result<ContactImportReport, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            contacts: &'a [NewContact],
        }
        self.post(
            self.api_url(&format!("campaigns/{campaign_id}/contacts"))?,
            &Body { contacts },
        )
        .await
    }

    /// `PUT /api/campaigns/{id}/contacts/{contactId}`.
    pub async fn update_contact(
        &self,
        campaign_id: &str,
        contact_id: &str,
        patch: &ContactPatch,
    ) -> Result<ContactDto, Error> {
        self.put(
            self.api_url(&format!("campaigns/{campaign_id}/contacts/{contact_id}"))?,
            patch,
        )
        .await
    }

    /// `DELETE /api/campaigns/{id}/contacts/{contactId}`.
    pub async fn remove_contact(&self, campaign_id: &str, contact_id: &str) -> Result<(), Error> {
        self.delete(self.api_url(&format!("campaigns/{campaign_id}/contacts/{contact_id}"))?)
            .await
    }
}
