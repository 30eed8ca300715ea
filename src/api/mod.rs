//! API module
//!
//! Contains HTTP request handlers for the contact endpoints

use crate::contacts::ContactDb;
use std::sync::Arc;

pub mod contacts;
pub mod health;

/// Shared state handed to every handler
pub type ApiState = Arc<ContactDb>;
