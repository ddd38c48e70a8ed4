use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    multipart::Form,
    Client, Method, RequestBuilder, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::PanelConfig;
use shared_models::{PanelError, Role};

/// How a request identifies itself to the backend.
#[derive(Debug, Clone, Copy)]
pub enum BackendAuth<'a> {
    None,
    /// Token sent under the role's custom header (`aToken` / `dToken`).
    Role(Role, &'a str),
    /// `Authorization: Bearer <token>`; only the feedback endpoint uses this.
    Bearer(&'a str),
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &PanelConfig) -> Result<Self, PanelError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| PanelError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.backend_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_headers(&self, auth: BackendAuth<'_>, json_body: bool) -> Result<HeaderMap, PanelError> {
        let mut headers = HeaderMap::new();

        if json_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        match auth {
            BackendAuth::None => {}
            BackendAuth::Role(role, token) => {
                let value = HeaderValue::from_str(token)
                    .map_err(|_| PanelError::Auth(format!("Stored {} token is malformed", role)))?;
                headers.insert(HeaderName::from_static(header_name(role)), value);
            }
            BackendAuth::Bearer(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| PanelError::Auth("Stored token is malformed".to_string()))?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        Ok(headers)
    }

    /// Send a request with an optional JSON body and decode the JSON response.
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth: BackendAuth<'_>,
        body: Option<Value>,
    ) -> Result<T, PanelError>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(method, path, auth, body).await?;
        decode(response).await
    }

    /// Like [`request`](Self::request) but discards the response body.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        auth: BackendAuth<'_>,
        body: Option<Value>,
    ) -> Result<(), PanelError> {
        self.execute(method, path, auth, body).await.map(|_| ())
    }

    /// POST a multipart form and decode the JSON response.
    pub async fn request_multipart<T>(
        &self,
        path: &str,
        auth: BackendAuth<'_>,
        form: Form,
    ) -> Result<T, PanelError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("Making multipart request to {}", url);

        let headers = self.get_headers(auth, false)?;
        let req = self.client.post(&url).headers(headers).multipart(form);

        let response = dispatch(req).await?;
        decode(response).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        auth: BackendAuth<'_>,
        body: Option<Value>,
    ) -> Result<Response, PanelError> {
        let url = self.url(path);
        debug!("Making {} request to {}", method, url);

        let headers = self.get_headers(auth, body.is_some())?;

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        dispatch(req).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn header_name(role: Role) -> &'static str {
    // HeaderName::from_static requires lowercase; header names are case-insensitive on the wire.
    match role {
        Role::Admin => "atoken",
        Role::Doctor => "dtoken",
    }
}

async fn dispatch(req: RequestBuilder) -> Result<Response, PanelError> {
    let response = req
        .send()
        .await
        .map_err(|e| PanelError::Transport(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    error!("API error ({}): {}", status, error_text);

    Err(status_error(status, &error_text))
}

async fn decode<T>(response: Response) -> Result<T, PanelError>
where
    T: DeserializeOwned,
{
    let bytes = response
        .bytes()
        .await
        .map_err(|e| PanelError::Transport(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(PanelError::from)
}

/// Map a non-2xx response onto the error taxonomy, preferring the backend's
/// own `message` field when the body carries one.
pub(crate) fn status_error(status: StatusCode, body: &str) -> PanelError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Request failed").to_string()
            } else {
                body.trim().to_string()
            }
        });

    match status.as_u16() {
        401 | 403 => PanelError::Auth(message),
        404 => PanelError::NotFound(message),
        400..=499 => PanelError::Rejected(message),
        _ => PanelError::Transport(format!("API error ({}): {}", status, message)),
    }
}
