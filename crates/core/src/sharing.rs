//! Strategy sharing dispatcher.
//!
//! Routes a compiled strategy to exactly one destination per request. Writes
//! (coach share, crew notifications, public link) go through [`ShareSink`];
//! device-side channels (share sheet, clipboard, WhatsApp, email) produce a
//! payload or deep link for the client to open.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::public_link::PublicLinkView;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Notification kind for a strategy shared with a coach.
pub const KIND_COACH_SHARE: &str = "strategy_shared_coach";

/// Notification kind for a strategy shared with crew.
pub const KIND_CREW_SHARE: &str = "strategy_shared_crew";

/// Message returned when a crew share has no recipients.
pub const EMPTY_CREW_SELECTION: &str = "Select at least one crew member";

/// Message returned when the device cannot open WhatsApp.
pub const WHATSAPP_UNAVAILABLE: &str = "WhatsApp is not installed on this device";

// ---------------------------------------------------------------------------
// Requests and outcomes
// ---------------------------------------------------------------------------

/// A share request, tagged by destination channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum ShareRequest {
    Coach {
        coach_id: DbId,
    },
    Crew {
        #[serde(default)]
        crew_member_ids: Vec<DbId>,
    },
    PublicLink {
        enabled: bool,
    },
    ShareSheet,
    Clipboard,
    Whatsapp {
        /// Result of the client's URL-openability probe for `whatsapp://`.
        can_open_whatsapp: bool,
    },
    Email {
        recipient: Option<String>,
    },
}

impl ShareRequest {
    pub fn channel_name(&self) -> &'static str {
        match self {
            ShareRequest::Coach { .. } => "coach",
            ShareRequest::Crew { .. } => "crew",
            ShareRequest::PublicLink { .. } => "public_link",
            ShareRequest::ShareSheet => "share_sheet",
            ShareRequest::Clipboard => "clipboard",
            ShareRequest::Whatsapp { .. } => "whatsapp",
            ShareRequest::Email { .. } => "email",
        }
    }
}

/// Result of a single dispatched share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum ShareOutcome {
    Coach { coach_id: DbId, share_id: DbId },
    Crew { notified: usize, skipped: usize },
    PublicLink(PublicLinkView),
    ShareSheet { title: String, text: String },
    Clipboard { text: String },
    Whatsapp { url: String },
    Email { url: String },
}

/// How a batched crew notification went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrewDelivery {
    pub notified: usize,
    /// Selected members that could not be notified (no account, or not in
    /// the sender's crew).
    pub skipped: usize,
}

/// The strategy being shared.
#[derive(Debug, Clone, Copy)]
pub struct ShareContext<'a> {
    pub race_id: DbId,
    pub sender_user_id: DbId,
    pub race_name: &'a str,
    pub text: &'a str,
}

impl ShareContext<'_> {
    pub fn title(&self) -> String {
        format!("Race strategy: {}", self.race_name)
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Side-effecting share destinations backed by persistent storage.
#[async_trait]
pub trait ShareSink: Send + Sync {
    type Error: From<CoreError> + Send;

    /// Record a share with one coach and notify them. Returns the share id.
    async fn share_with_coach(
        &self,
        ctx: &ShareContext<'_>,
        coach_id: DbId,
    ) -> Result<DbId, Self::Error>;

    /// Notify the selected crew members in one batch.
    async fn notify_crew(
        &self,
        ctx: &ShareContext<'_>,
        crew_member_ids: &[DbId],
    ) -> Result<CrewDelivery, Self::Error>;

    /// Set the public-link flag on the strategy record.
    async fn set_public_link(
        &self,
        ctx: &ShareContext<'_>,
        enabled: bool,
    ) -> Result<PublicLinkView, Self::Error>;
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Perform exactly one share action.
pub async fn dispatch<S: ShareSink>(
    sink: &S,
    ctx: &ShareContext<'_>,
    request: ShareRequest,
) -> Result<ShareOutcome, S::Error> {
    match request {
        ShareRequest::Coach { coach_id } => {
            let share_id = sink.share_with_coach(ctx, coach_id).await?;
            Ok(ShareOutcome::Coach { coach_id, share_id })
        }
        ShareRequest::Crew { crew_member_ids } => {
            let ids = normalize_selection(crew_member_ids);
            if ids.is_empty() {
                return Err(CoreError::Validation(EMPTY_CREW_SELECTION.to_string()).into());
            }
            let delivery = sink.notify_crew(ctx, &ids).await?;
            Ok(ShareOutcome::Crew {
                notified: delivery.notified,
                skipped: delivery.skipped,
            })
        }
        ShareRequest::PublicLink { enabled } => {
            let view = sink.set_public_link(ctx, enabled).await?;
            Ok(ShareOutcome::PublicLink(view))
        }
        ShareRequest::ShareSheet => Ok(ShareOutcome::ShareSheet {
            title: ctx.title(),
            text: ctx.text.to_string(),
        }),
        ShareRequest::Clipboard => Ok(ShareOutcome::Clipboard {
            text: ctx.text.to_string(),
        }),
        ShareRequest::Whatsapp { can_open_whatsapp } => {
            if !can_open_whatsapp {
                return Err(
                    CoreError::CapabilityUnavailable(WHATSAPP_UNAVAILABLE.to_string()).into(),
                );
            }
            Ok(ShareOutcome::Whatsapp {
                url: whatsapp_url(ctx.text),
            })
        }
        ShareRequest::Email { recipient } => {
            let url = mailto_url(recipient.as_deref(), &ctx.title(), ctx.text)
                .map_err(CoreError::Validation)?;
            Ok(ShareOutcome::Email { url })
        }
    }
}

/// Sort and de-duplicate a crew selection.
fn normalize_selection(mut ids: Vec<DbId>) -> Vec<DbId> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// `whatsapp://send?text=…` deep link.
pub fn whatsapp_url(text: &str) -> String {
    format!("whatsapp://send?text={}", urlencoding::encode(text))
}

/// `mailto:` deep link with subject and body.
pub fn mailto_url(recipient: Option<&str>, subject: &str, body: &str) -> Result<String, String> {
    let to = match recipient.map(str::trim).filter(|r| !r.is_empty()) {
        Some(r) => {
            validate_email(r)?;
            r
        }
        None => "",
    };
    Ok(format!(
        "mailto:{to}?subject={}&body={}",
        urlencoding::encode(subject),
        urlencoding::encode(body)
    ))
}

fn validate_email(address: &str) -> Result<(), String> {
    let valid = match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !address.contains(char::is_whitespace)
                && !domain.contains('@')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(format!("Invalid email address '{address}'"))
    }
}
