//! Static chat page, embedded at compile time.

/// The chat page: an input box over a scrollable message list.
pub const CHAT_HTML: &str = include_str!("../assets/chat.html");
