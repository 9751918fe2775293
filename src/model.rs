//! Accounts, statuses and the records they own.
//!
//! Entities are built once from JSON and are immutable afterwards, apart from
//! the `favourited`/`reblogged` flags flipped by [`crate::actions`]. Nested
//! entities (`Account::moved`, `Status::reblog`, `Status::account`) are held in
//! `Arc`s since the same record may be reachable from several timelines.

pub mod account;
pub mod entity;
pub mod status;

pub use self::account::Account;
pub use self::entity::{AccountSource, Application, Attachment, Emoji, Icon, MediaType, Mention, Tag};
pub use self::status::{Status, Visibility};

use crate::resolver;
use std::borrow::Cow;
use url::Url;

/// Something with a stable id and permalink.
pub trait Identifiable {
    fn id(&self) -> &str;
    fn perma_link(&self) -> &Url;
}

/// Something with a display title and a plain-text description.
pub trait Renderable {
    fn title(&self) -> Cow<'_, str>;
    fn description(&self) -> Cow<'_, str>;
}

/// A message that may sit in a conversation: reply to another message,
/// have neighbours in a thread, or quote other messages by permalink.
///
/// The network operations in [`crate::resolver`] are written against this.
pub trait Threadable: Identifiable {
    /// Instance the message was fetched from; relative API calls go there.
    fn domain(&self) -> Option<&str>;

    /// Id used for thread lookups.
    fn thread_id(&self) -> &str;

    fn reply_to_id(&self) -> Option<&str>;

    /// Rendered HTML of the message body.
    fn body(&self) -> &str;

    fn has_receive_message(&self) -> bool {
        self.reply_to_id().is_some()
    }

    fn is_quoting(&self) -> bool {
        resolver::is_quoting(self.body())
    }
}
