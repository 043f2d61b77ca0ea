//! Runner configuration, read from the environment.

use std::str::FromStr;

use anyhow::{Context, Result};
use url::Url;

use moonhowl_domain::RoleTag;

use crate::session::SubmissionPolicy;

pub const DEFAULT_WS_URL: &str = "ws://127.0.0.1:3456/ws";

/// Which side of the room this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    Moderator,
    #[default]
    Player,
}

impl FromStr for SessionMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gm" | "moderator" => Ok(SessionMode::Moderator),
            "player" => Ok(SessionMode::Player),
            other => anyhow::bail!("Unknown session mode: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub ws_url: Url,
    pub room_code: String,
    pub player_id: String,
    pub mode: SessionMode,
    pub role: Option<RoleTag>,
    pub policy: SubmissionPolicy,
}

impl ClientConfig {
    /// Read configuration from `MOONHOWL_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let ws_url = lookup("MOONHOWL_WS_URL").unwrap_or_else(|| DEFAULT_WS_URL.to_string());
        let ws_url = Url::parse(&ws_url).context("MOONHOWL_WS_URL is not a valid URL")?;

        let room_code = lookup("MOONHOWL_ROOM_CODE").context("MOONHOWL_ROOM_CODE must be set")?;

        let player_id = lookup("MOONHOWL_PLAYER_ID")
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let mode = match lookup("MOONHOWL_MODE") {
            Some(raw) => raw.parse().context("MOONHOWL_MODE")?,
            None => SessionMode::default(),
        };

        let role = match lookup("MOONHOWL_ROLE") {
            Some(raw) => Some(
                raw.parse::<RoleTag>()
                    .map_err(|e| anyhow::anyhow!("MOONHOWL_ROLE: {e}"))?,
            ),
            None => None,
        };

        let policy = match lookup("MOONHOWL_SUBMIT_POLICY").as_deref() {
            Some("allow-skip") => SubmissionPolicy::AllowSkip,
            Some("require-choice") | None => SubmissionPolicy::RequireChoice,
            Some(other) => anyhow::bail!("Unknown submit policy: {other}"),
        };

        Ok(Self {
            ws_url,
            room_code,
            player_id,
            mode,
            role,
            policy,
        })
    }
}
