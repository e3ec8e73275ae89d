//! Slack-compatible incoming webhook message model.

use serde::{Serialize, Serializer};

/// Attachment side-bar color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Needs attention
    Danger,
    /// Nothing to do
    Good,
}

impl Color {
    /// Hex color sent to Slack.
    #[must_use]
    pub const fn hex(&self) -> &'static str {
        match self {
            Self::Danger => "#e74c3c", // Red
            Self::Good => "#2ecc71",   // Green
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}

/// One webhook post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Destination channel, e.g. `#support` or `@alice`.
    pub channel: String,
    /// Bot display name.
    pub username: String,
    /// Bot avatar, e.g. `:ticket:`.
    pub icon_emoji: String,
    /// Leading summary line.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    pub attachments: Vec<Attachment>,
}

/// A color-coded block under the message text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    /// Plain-text rendering for clients that cannot show attachments.
    pub fallback: String,
    pub text: String,
    /// Section header shown above the attachment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretext: Option<String>,
    pub color: Color,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub value: String,
    pub short: bool,
}
