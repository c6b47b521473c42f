//! Public strategy link state.
//!
//! A strategy is either shared publicly or not. The token survives a
//! disable so a later enable brings the same link back; [`rotate`] issues a
//! fresh token when old links must stop working for good.

use rand::Rng;
use serde::Serialize;

use crate::types::Timestamp;

/// Length of generated public tokens (alphanumeric characters).
pub const TOKEN_LENGTH: usize = 32;

/// Path segment under the public web URL where shared strategies live.
pub const STRATEGY_SHARE_PATH: &str = "share/strategy";

/// Persisted public-sharing fields of a strategy record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublicLinkState {
    pub enabled: bool,
    pub token: Option<String>,
    pub shared_at: Option<Timestamp>,
}

/// What the client sees after a toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicLinkView {
    pub enabled: bool,
    pub token: Option<String>,
    /// Present only while the link is enabled.
    pub url: Option<String>,
    pub shared_at: Option<Timestamp>,
}

/// Generate a random public token.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Enable public sharing, keeping an existing token or minting one.
pub fn enable(state: &PublicLinkState, now: Timestamp) -> PublicLinkState {
    PublicLinkState {
        enabled: true,
        token: Some(state.token.clone().unwrap_or_else(generate_token)),
        shared_at: Some(now),
    }
}

/// Disable public sharing. The token and share time stay stored.
pub fn disable(state: &PublicLinkState) -> PublicLinkState {
    PublicLinkState {
        enabled: false,
        ..state.clone()
    }
}

/// Apply a toggle request.
pub fn toggle(state: &PublicLinkState, enabled: bool, now: Timestamp) -> PublicLinkState {
    if enabled {
        enable(state, now)
    } else {
        disable(state)
    }
}

/// Replace the token. The enabled flag is left as it was.
pub fn rotate(state: &PublicLinkState, now: Timestamp) -> PublicLinkState {
    PublicLinkState {
        enabled: state.enabled,
        token: Some(generate_token()),
        shared_at: if state.enabled { Some(now) } else { state.shared_at },
    }
}

/// Shareable URL for a token under the public web base URL.
pub fn public_url(base_url: &str, token: &str) -> String {
    format!(
        "{}/{STRATEGY_SHARE_PATH}/{token}",
        base_url.trim_end_matches('/')
    )
}

/// Whether anonymous readers may see the strategy behind `token`.
pub fn grants_access(state: &PublicLinkState, token: &str) -> bool {
    state.enabled && state.token.as_deref() == Some(token)
}

impl PublicLinkState {
    pub fn view(&self, base_url: &str) -> PublicLinkView {
        let url = match (&self.token, self.enabled) {
            (Some(token), true) => Some(public_url(base_url, token)),
            _ => None,
        };
        PublicLinkView {
            enabled: self.enabled,
            token: self.token.clone(),
            url,
            shared_at: self.shared_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const BASE: &str = "https://regatta.example.com/";

    #[test]
    fn enable_from_scratch_yields_url_with_token() {
        let state = enable(&PublicLinkState::default(), Utc::now());
        let view = state.view(BASE);
        let token = view.token.clone().unwrap();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(view.url.unwrap().ends_with(&token));
        assert!(view.shared_at.is_some());
    }

    #[test]
    fn disable_keeps_token() {
        let enabled = enable(&PublicLinkState::default(), Utc::now());
        let disabled = disable(&enabled);
        assert!(!disabled.enabled);
        assert_eq!(disabled.token, enabled.token);
        assert_eq!(disabled.shared_at, enabled.shared_at);
        assert!(disabled.view(BASE).url.is_none());
    }

    #[test]
    fn re_enable_reuses_token() {
        let first = enable(&PublicLinkState::default(), Utc::now());
        let again = toggle(&disable(&first), true, Utc::now());
        assert_eq!(again.token, first.token);
        assert!(again.enabled);
    }

    #[test]
    fn rotate_replaces_token() {
        let first = enable(&PublicLinkState::default(), Utc::now());
        let rotated = rotate(&first, Utc::now());
        assert_ne!(rotated.token, first.token);
        assert!(rotated.enabled);
    }

    #[test]
    fn access_requires_enabled_flag_and_matching_token() {
        let state = enable(&PublicLinkState::default(), Utc::now());
        let token = state.token.clone().unwrap();
        assert!(grants_access(&state, &token));
        assert!(!grants_access(&state, "wrong"));
        assert!(!grants_access(&disable(&state), &token));
    }

    #[test]
    fn url_joins_without_double_slash() {
        assert_eq!(
            public_url("https://x.test/", "abc"),
            "https://x.test/share/strategy/abc"
        );
        assert_eq!(
            public_url("https://x.test", "abc"),
            "https://x.test/share/strategy/abc"
        );
    }

    #[test]
    fn tokens_are_alphanumeric() {
        let token = generate_token();
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
