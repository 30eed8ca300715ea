//! Sample data for a fresh database

use crate::contacts::db::ContactDb;
use crate::contacts::models::NewContact;
use crate::error::AppError;
use tracing::info;

const SAMPLE_CONTACTS: [(&str, &str, &str, &str); 5] = [
    (
        "John Doe",
        "john.doe@example.com",
        "+1 (555) 123-4567",
        "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop&crop=face",
    ),
    (
        "Jane Smith",
        "jane.smith@example.com",
        "+1 (555) 234-5678",
        "https://images.unsplash.com/photo-1494790108755-2616b612b786?w=150&h=150&fit=crop&crop=face",
    ),
    (
        "Mike Johnson",
        "mike.johnson@example.com",
        "+1 (555) 345-6789",
        "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150&h=150&fit=crop&crop=face",
    ),
    (
        "Sarah Wilson",
        "sarah.wilson@example.com",
        "+1 (555) 456-7890",
        "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=150&h=150&fit=crop&crop=face",
    ),
    (
        "David Brown",
        "david.brown@example.com",
        "+1 (555) 567-8901",
        "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=150&h=150&fit=crop&crop=face",
    ),
];

/// The built-in sample contacts
pub fn sample_contacts() -> Vec<NewContact> {
    SAMPLE_CONTACTS
        .iter()
        .map(|(name, email, phone, avatar)| NewContact {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            avatar: Some(avatar.to_string()),
        })
        .collect()
}

/// Insert the sample contacts when the table is empty
///
/// # Returns
/// * `Ok(n)` - number of contacts inserted, 0 if the table already had rows
pub async fn seed_sample_contacts(db: &ContactDb) -> Result<usize, AppError> {
    if db.count().await? > 0 {
        return Ok(0);
    }

    let inserted = db.insert_all(&sample_contacts()).await?;
    info!(count = inserted, "Sample contacts created");
    Ok(inserted)
}
