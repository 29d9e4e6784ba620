use crate::error::{ClientError, ClientErrorExt};
use caphub::domain::api::{
    ErrorBody, LoginRequest, LoginResponse, MessageResponse, RegistrationResponse,
    RequestsResponse, SessionResponse,
};
use caphub::domain::catalog::CapabilityCatalog;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use zeroize::Zeroize;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// JSON client for the Capabilities Hub HTTP API.
///
/// The session token, once known, is sent as `Authorization: Bearer` on every request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(server: &str, token: Option<String>) -> Result<Self, ClientError> {
        let base = Url::parse(server)
            .map_err(|e| ClientError::config(format!("Invalid server URL {server:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::config(format!("Invalid server URL {server:?}")));
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("caphub-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Building HTTP client")?;

        Ok(Self { http, base, token })
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    #[must_use]
    pub fn server(&self) -> &str {
        self.base.as_str()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub async fn me(&self) -> Result<SessionResponse, ClientError> {
        self.send(Method::GET, &["auth", "me"], None).await
    }

    /// Logs in and keeps the issued token for subsequent calls.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, ClientError> {
        let mut body = LoginRequest { username: username.to_owned(), password: password.to_owned() };
        let request = self.request(Method::POST, &["auth", "login"], None)?.json(&body);
        body.password.zeroize();

        let response: LoginResponse = Self::execute(request).await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    /// Ends the session on the server and forgets the token locally.
    pub async fn logout(&mut self) -> Result<MessageResponse, ClientError> {
        let response = self.send(Method::POST, &["auth", "logout"], None).await?;
        self.token = None;
        Ok(response)
    }

    pub async fn capabilities(&self) -> Result<CapabilityCatalog, ClientError> {
        self.send(Method::GET, &["capabilities"], None).await
    }

    pub async fn register(
        &self,
        capability: &str,
        email: &str,
    ) -> Result<RegistrationResponse, ClientError> {
        self.send(Method::POST, &["capabilities", capability, "register"], Some(email)).await
    }

    pub async fn unregister(
        &self,
        capability: &str,
        email: &str,
    ) -> Result<MessageResponse, ClientError> {
        self.send(Method::DELETE, &["capabilities", capability, "unregister"], Some(email)).await
    }

    pub async fn pending_requests(&self) -> Result<RequestsResponse, ClientError> {
        self.send(Method::GET, &["registration-requests"], None).await
    }

    pub async fn approve(
        &self,
        capability: &str,
        email: &str,
    ) -> Result<MessageResponse, ClientError> {
        self.send(Method::POST, &["registration-requests", capability, "approve"], Some(email))
            .await
    }

    pub async fn reject(
        &self,
        capability: &str,
        email: &str,
    ) -> Result<MessageResponse, ClientError> {
        self.send(Method::POST, &["registration-requests", capability, "reject"], Some(email))
            .await
    }

    /// Builds the URL for `segments` below the server base. Each segment is
    /// percent-encoded on its own, so capability names may contain `/`.
    pub fn endpoint(&self, segments: &[&str], email: Option<&str>) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::config("Server URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);

        if let Some(email) = email {
            url.query_pairs_mut().append_pair("email", email);
        }
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        email: Option<&str>,
    ) -> Result<RequestBuilder, ClientError> {
        let url = self.endpoint(segments, email)?;
        debug!(%method, %url, "Sending request");

        let request = self.http.request(method, url);
        Ok(match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        email: Option<&str>,
    ) -> Result<T, ClientError> {
        let request = self.request(method, segments, email)?;
        Self::execute(request).await
    }

    async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body).map_or_else(
                |_| status.canonical_reason().unwrap_or("Request failed").to_owned(),
                |error| error.detail,
            );
            debug!(status = status.as_u16(), %message, "Request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: message.into(),
                context: None,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}
