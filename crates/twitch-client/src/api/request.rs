use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use super::*;

impl TwitchApiClient {
    pub fn new(client_id: String) -> Self {
        Self::with_http(client_id, reqwest::Client::new())
    }

    /// Create a client sharing an existing HTTP client (timeouts, pool).
    pub fn with_http(client_id: String, http: reqwest::Client) -> Self {
        Self {
            http,
            client_id,
            base_url: HELIX_BASE.to_string(),
        }
    }

    /// Point the client at a different Helix root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build auth headers from the given token.
    fn auth_headers(&self, token: &Token) -> Result<HeaderMap, TwitchError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", token.access_token);
        let bearer = HeaderValue::from_str(&bearer)
            .map_err(|_| TwitchError::InvalidHeader("Authorization".into()))?;
        let client_id = HeaderValue::from_str(&self.client_id)
            .map_err(|_| TwitchError::InvalidHeader("Client-Id".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("Client-Id", client_id);
        Ok(headers)
    }

    /// Execute a GET request against `{base}/{path}` with auth headers.
    ///
    /// A 401 is returned as an error like any other non-success status; the
    /// caller decides whether to discard the token.
    pub(super) async fn authenticated_get(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: &Token,
    ) -> Result<String, TwitchError> {
        let url = format!("{}/{path}", self.base_url);
        let headers = self.auth_headers(token)?;
        let resp = self
            .http
            .get(&url)
            .headers(headers)
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %url, "Got 401, app token was rejected");
            return Err(TwitchError::ApiError {
                status: 401,
                message: body,
            });
        }

        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Helix request failed");
            return Err(TwitchError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(body)
    }
}
