//! Placeholder avatars
//!
//! Contacts created without an avatar get a generated initials image URL.

/// Base URL of the initials-avatar service
pub const AVATAR_BASE_URL: &str = "https://ui-avatars.com/api/";

/// Build the placeholder avatar URL for a contact name
///
/// Spaces become `+`; nothing else is encoded.
pub fn default_avatar_url(name: &str) -> String {
    format!(
        "{}?name={}&background=random&color=fff&size=150",
        AVATAR_BASE_URL,
        name.replace(' ', "+")
    )
}
