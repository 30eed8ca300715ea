//! Contact data models
//!
//! Defines the stored contact row and the request shapes used to create,
//! update and list contacts.

use crate::contacts::avatar::default_avatar_url;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Default page size for contact listings
pub const DEFAULT_LIMIT: i64 = 100;

/// Largest page a single listing may return
pub const MAX_LIMIT: i64 = 1000;

/// A stored contact record
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Contact {
    /// System-assigned identifier, never reused
    pub id: i64,
    /// Display name
    pub name: String,
    /// Email address, unique across all contacts
    pub email: String,
    /// Phone number as entered
    pub phone: String,
    /// Avatar image URL
    pub avatar: Option<String>,
    /// When the contact was created
    pub created_at: DateTime<Utc>,
    /// When the contact was last modified
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a contact
#[derive(Debug, Clone, Deserialize)]
pub struct NewContact {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Avatar URL; a placeholder is derived from the name when missing
    #[serde(default)]
    pub avatar: Option<String>,
}

impl NewContact {
    /// Reject blank required fields
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_blank("name", &self.name)?;
        require_non_blank("email", &self.email)?;
        require_non_blank("phone", &self.phone)?;
        Ok(())
    }

    /// The avatar to store: the supplied one, or a placeholder built from the name
    pub fn resolved_avatar(&self) -> String {
        match self.avatar.as_deref() {
            Some(avatar) if !avatar.trim().is_empty() => avatar.to_string(),
            _ => default_avatar_url(&self.name),
        }
    }
}

/// Partial update of a contact
///
/// Only fields present in the request are applied. `avatar` distinguishes an
/// absent field (`None`) from an explicit `null` (`Some(None)`), which clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactUpdate {
    /// New display name
    #[serde(default)]
    pub name: Option<String>,
    /// New email address
    #[serde(default)]
    pub email: Option<String>,
    /// New phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// New avatar URL, or `Some(None)` to clear it
    #[serde(default, deserialize_with = "deserialize_present")]
    pub avatar: Option<Option<String>>,
}

impl ContactUpdate {
    /// Reject blank values for required fields that are being changed
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            require_non_blank("name", name)?;
        }
        if let Some(email) = &self.email {
            require_non_blank("email", email)?;
        }
        if let Some(phone) = &self.phone {
            require_non_blank("phone", phone)?;
        }
        Ok(())
    }

    /// Merge the supplied fields into `contact`, stamping `updated_at`
    pub fn apply_to(self, contact: &mut Contact, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            contact.name = name;
        }
        if let Some(email) = self.email {
            contact.email = email;
        }
        if let Some(phone) = self.phone {
            contact.phone = phone;
        }
        if let Some(avatar) = self.avatar {
            contact.avatar = avatar;
        }
        contact.updated_at = now;
    }
}

/// Query parameters for listing contacts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Number of rows to skip
    pub skip: Option<i64>,
    /// Maximum number of rows to return
    pub limit: Option<i64>,
    /// Substring to match against name, email or phone
    pub search: Option<String>,
}

impl ListParams {
    /// Offset with negatives clamped to zero
    pub fn offset(&self) -> i64 {
        self.skip.unwrap_or(0).max(0)
    }

    /// Page size clamped to `0..=MAX_LIMIT`
    pub fn page_size(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(0, MAX_LIMIT)
    }

    /// Search term, ignoring an empty string
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Wraps whatever was present (including `null`) in `Some`
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
