//! Contact database operations
//!
//! Handles all database interactions for contacts. Mutations run inside an
//! immediate transaction that rolls back when dropped, so every early return
//! leaves the table untouched and concurrent writers queue on the busy timeout.

use crate::contacts::models::{Contact, ContactUpdate, ListParams, NewContact};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Connection, Sqlite, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

const CONTACT_COLUMNS: &str = "id, name, email, phone, avatar, created_at, updated_at";

/// How long a writer waits for another writer's lock before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Takes the write lock up front; a deferred transaction that reads first
/// cannot upgrade its lock while another writer is active
const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

/// Database connection pool for contact operations
pub struct ContactDb {
    pool: SqlitePool,
}

impl ContactDb {
    /// Open (creating if missing) the SQLite database and run migrations
    ///
    /// # Arguments
    /// * `db_url` - Database path, with or without the `sqlite:` prefix
    /// * `max_connections` - Pool size
    pub async fn new(db_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let connection_string = if db_url.starts_with("sqlite:") {
            db_url.to_string()
        } else {
            format!("sqlite:{}", db_url)
        };

        let file_path = connection_string
            .trim_start_matches("sqlite:")
            .trim_start_matches("//");
        if !file_path.starts_with(":memory:") {
            if let Some(parent) = Path::new(file_path).parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Failed to create db directory: {}", e))
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database path: {}", e)))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to connect to database: {}", e))
            })?;

        info!("Connected to SQLite database at: {}", db_url);

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Create the contacts table and its indices if they do not exist
    async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");

        sqlx::raw_sql(include_str!("../../migrations/001_create_contacts.sql"))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Migration failed: {}", e)))?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Total number of stored contacts
    pub async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// One page of contacts ordered by id, optionally filtered by substring
    pub async fn list(&self, params: &ListParams) -> Result<Vec<Contact>, AppError> {
        self.fetch_matching(
            params.search_term(),
            Some((params.page_size(), params.offset())),
        )
        .await
    }

    /// Every contact whose name, email or phone contains `term`
    pub async fn search(&self, term: &str) -> Result<Vec<Contact>, AppError> {
        self.fetch_matching(Some(term).filter(|t| !t.is_empty()), None)
            .await
    }

    /// Shared filter behind `list` and `search`
    async fn fetch_matching(
        &self,
        term: Option<&str>,
        page: Option<(i64, i64)>,
    ) -> Result<Vec<Contact>, AppError> {
        let mut sql = format!("SELECT {} FROM contacts", CONTACT_COLUMNS);
        if term.is_some() {
            sql.push_str(
                " WHERE name LIKE ? ESCAPE '\\' OR email LIKE ? ESCAPE '\\' OR phone LIKE ? ESCAPE '\\'",
            );
        }
        sql.push_str(" ORDER BY id ASC");
        if page.is_some() {
            sql.push_str(" LIMIT ? OFFSET ?");
        }

        let mut query = sqlx::query_as::<_, Contact>(&sql);
        if let Some(term) = term {
            let pattern = like_pattern(term);
            query = query
                .bind(pattern.clone())
                .bind(pattern.clone())
                .bind(pattern);
        }
        if let Some((limit, offset)) = page {
            query = query.bind(limit).bind(offset);
        }

        let contacts = query.fetch_all(&self.pool).await?;
        debug!(
            search = ?term,
            returned = contacts.len(),
            "Fetched contacts"
        );
        Ok(contacts)
    }

    /// Get a contact by ID
    pub async fn get(&self, id: i64) -> Result<Option<Contact>, AppError> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {} FROM contacts WHERE id = ?",
            CONTACT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    /// Create a contact, deriving the avatar when none is given
    pub async fn create(&self, new_contact: NewContact) -> Result<Contact, AppError> {
        new_contact.validate()?;

        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin_with(BEGIN_WRITE).await?;
        if email_taken(&mut tx, &new_contact.email, None).await? {
            return Err(AppError::EmailConflict(new_contact.email));
        }

        let avatar = new_contact.resolved_avatar();
        let contact = insert_contact(&mut tx, &new_contact, &avatar, Utc::now()).await?;
        tx.commit().await?;

        debug!(contact_id = contact.id, "Created contact");
        Ok(contact)
    }

    /// Insert several contacts in one transaction; all or nothing
    pub async fn insert_all(&self, contacts: &[NewContact]) -> Result<usize, AppError> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin_with(BEGIN_WRITE).await?;
        let now = Utc::now();
        for new_contact in contacts {
            let avatar = new_contact.resolved_avatar();
            insert_contact(&mut tx, new_contact, &avatar, now).await?;
        }
        tx.commit().await?;
        Ok(contacts.len())
    }

    /// Apply a partial update and refresh `updated_at`
    pub async fn update(&self, id: i64, update: ContactUpdate) -> Result<Contact, AppError> {
        update.validate()?;

        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin_with(BEGIN_WRITE).await?;
        let mut contact = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {} FROM contacts WHERE id = ?",
            CONTACT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::ContactNotFound(id))?;

        if let Some(email) = update.email.as_deref() {
            if email != contact.email && email_taken(&mut tx, email, Some(id)).await? {
                return Err(AppError::EmailConflict(email.to_string()));
            }
        }

        update.apply_to(&mut contact, Utc::now());

        sqlx::query(
            "UPDATE contacts SET name = ?, email = ?, phone = ?, avatar = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.avatar)
        .bind(contact.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| unique_violation_as_conflict(e, &contact.email))?;

        tx.commit().await?;

        debug!(contact_id = id, "Updated contact");
        Ok(contact)
    }

    /// Permanently delete a contact
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ContactNotFound(id));
        }

        debug!(contact_id = id, "Deleted contact");
        Ok(())
    }

}

/// Whether a contact other than `except_id` already holds `email`
async fn email_taken(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    email: &str,
    except_id: Option<i64>,
) -> Result<bool, AppError> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM contacts WHERE email = ?")
        .bind(email)
        .fetch_optional(&mut **tx)
        .await?;

    Ok(matches!(existing, Some(found) if Some(found) != except_id))
}

async fn insert_contact(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    new_contact: &NewContact,
    avatar: &str,
    now: DateTime<Utc>,
) -> Result<Contact, AppError> {
    sqlx::query_as::<_, Contact>(&format!(
        "INSERT INTO contacts (name, email, phone, avatar, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING {}",
        CONTACT_COLUMNS
    ))
    .bind(&new_contact.name)
    .bind(&new_contact.email)
    .bind(&new_contact.phone)
    .bind(avatar)
    .bind(now)
    .bind(now)
    .fetch_one(&mut **tx)
    .await
    .map_err(|e| unique_violation_as_conflict(e, &new_contact.email))
}

/// The unique index on `email` is the final arbiter when two writers race
fn unique_violation_as_conflict(error: sqlx::Error, email: &str) -> AppError {
    match error {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::EmailConflict(email.to_string())
        }
        other => AppError::Database(other),
    }
}

/// `%term%` with LIKE wildcards in `term` escaped so they match literally
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
