//! Small records owned by accounts and statuses.

use crate::api::v1::{id, optional_url, AttachmentId, MentionId};
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Application {
    pub name: String,
    #[serde(default, deserialize_with = "optional_url")]
    pub website: Option<Url>,
}

/// A custom emoji used in a status.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Emoji {
    pub shortcode: String,
    pub static_url: Url,
    pub url: Url,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Gifv,
    Audio,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Attachment {
    #[serde(deserialize_with = "id")]
    pub id: AttachmentId,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default, deserialize_with = "optional_url")]
    pub url: Option<Url>,
    #[serde(default, deserialize_with = "optional_url")]
    pub remote_url: Option<Url>,
    pub preview_url: Url,
    #[serde(default, deserialize_with = "optional_url")]
    pub text_url: Option<Url>,
    pub description: Option<String>,
    /// Dimensions, focus point and so on; passed through untouched.
    #[serde(default)]
    pub meta: Option<Value>,
}

/// A referenced account, without the full account record.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Mention {
    pub url: Url,
    pub username: String,
    pub acct: String,
    #[serde(deserialize_with = "id")]
    pub id: MentionId,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Tag {
    pub name: String,
    pub url: Url,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct AccountSource {
    pub privacy: Option<String>,
    pub sensitive: Option<bool>,
    pub note: Option<String>,
}

const AVATAR_PATH: &str = "/system/accounts/avatars/";

/// An account avatar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub uri: Url,
}

impl Icon {
    pub fn new(uri: Url) -> Icon {
        Icon { uri }
    }

    /// Whether `uri` points at an avatar stored by a Mastodon instance.
    pub fn handles(uri: &Url) -> bool {
        uri.path().starts_with(AVATAR_PATH)
    }
}
