//! Twitch Helix REST API client.
//!
//! Provides typed access to the user lookup and clip listing endpoints
//! with Bearer token + Client-ID header injection.

mod clips;
mod request;
mod users;

pub mod models;

pub use clips::CLIPS_PAGE_SIZE;
pub use models::{
    Clip, ClipBatch, ClipsResponse, DateWindow, HelixPagination, HelixResponse, TwitchUser,
};

use crate::{Token, TwitchError};

const HELIX_BASE: &str = "https://api.twitch.tv/helix";

/// Twitch Helix API client with auth header injection.
pub struct TwitchApiClient {
    pub(super) http: reqwest::Client,
    pub(super) client_id: String,
    pub(super) base_url: String,
}
