//! Contacts module
//!
//! Contact records, their SQLite storage, placeholder avatars and
//! startup seeding.

pub mod avatar;
pub mod db;
pub mod models;
pub mod seed;

pub use avatar::default_avatar_url;
pub use db::ContactDb;
pub use models::{Contact, ContactUpdate, ListParams, NewContact};
pub use seed::seed_sample_contacts;
