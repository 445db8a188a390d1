use super::*;

impl TwitchApiClient {
    /// Get user profile by login name.
    ///
    /// Zero matches is reported as [`TwitchError::ChannelNotFound`]. A 2xx body
    /// that does not parse, or whose first user has an empty id, is reported as
    /// [`TwitchError::MalformedResponse`]; non-2xx statuses as
    /// [`TwitchError::ApiError`].
    pub async fn get_user_by_login(
        &self,
        token: &Token,
        login: &str,
    ) -> Result<TwitchUser, TwitchError> {
        let query = [("login", login.to_string())];
        let body = self.authenticated_get("users", &query, token).await?;
        let resp: HelixResponse<TwitchUser> = serde_json::from_str(&body)
            .map_err(|e| TwitchError::MalformedResponse(format!("users response: {e}")))?;

        let user = resp
            .data
            .into_iter()
            .next()
            .ok_or_else(|| TwitchError::ChannelNotFound(login.to_string()))?;

        if user.id.is_empty() {
            return Err(TwitchError::MalformedResponse(format!(
                "user '{login}' has an empty id"
            )));
        }

        Ok(user)
    }
}
