use crate::config::DatabaseLocation;
use crate::domain::ContactId;
use crate::error::{StoreError, StoreResult};
use crate::models::{Contact, ContactFields, Field};
use crate::store::schema;
use crate::store::traits::{ContactFilter, ContactStore};
use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

type RawRow = (String, String, String, String);

/// Contact store backed by a single SQLite connection.
///
/// rusqlite is blocking, so every operation is shipped to
/// `tokio::task::spawn_blocking` and waits for the connection lock there.
#[derive(Clone)]
pub struct SqliteContactStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteContactStore {
    /// Open the store at the configured location.
    pub fn open(location: &DatabaseLocation) -> StoreResult<Self> {
        match location {
            DatabaseLocation::File(path) => Self::open_file(path),
            DatabaseLocation::InMemory => Self::open_in_memory(),
        }
    }

    /// Open or create a database file, creating parent directories as needed.
    pub fn open_file(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Open {
                    path: parent.display().to_string(),
                    reason: e.to_string(),
                })?;
            }
        }

        debug!("Opening contact database at {}", path.display());
        let conn = Connection::open(path).map_err(|e| StoreError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        schema::initialize_schema(&conn)?;

        info!("Contact database ready at {}", path.display());
        Ok(Self::from_connection(conn))
    }

    /// Create a private in-memory database, mostly for tests.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Open {
            path: ":memory:".to_string(),
            reason: e.to_string(),
        })?;
        schema::initialize_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `op` against the connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, op: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            op(&guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

/// Column holding `field`. Never built from user input.
fn column(field: Field) -> &'static str {
    field.as_str()
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_contact((id, name, phone, email): RawRow) -> StoreResult<Contact> {
    let id = ContactId::new(id).map_err(|e| StoreError::Corrupt(e.to_string()))?;
    Ok(Contact {
        id,
        name,
        phone,
        email,
    })
}

/// Turn a unique-constraint failure into a field conflict.
///
/// SQLite reports these as `UNIQUE constraint failed: contacts.<column>`.
fn map_write_error(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(ref failure, Some(ref message)) = err {
        if failure.code == ErrorCode::ConstraintViolation {
            let conflicting = [Field::Name, Field::Phone, Field::Email]
                .into_iter()
                .find(|field| message.ends_with(&format!("contacts.{}", column(*field))));
            if let Some(field) = conflicting {
                return StoreError::Conflict(field);
            }
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl ContactStore for SqliteContactStore {
    async fn find_one(&self, filter: &ContactFilter) -> StoreResult<Option<Contact>> {
        let sql = format!(
            "SELECT id, name, phone, email FROM contacts WHERE {} = ?1 LIMIT 1",
            column(filter.field)
        );
        let value = filter.value.clone();

        let row = self
            .with_conn(move |conn| Ok(conn.query_row(&sql, [&value], read_row).optional()?))
            .await?;

        row.map(into_contact).transpose()
    }

    async fn find_all(&self) -> StoreResult<Vec<Contact>> {
        let rows = self
            .with_conn(|conn| {
                let mut stmt =
                    conn.prepare("SELECT id, name, phone, email FROM contacts ORDER BY rowid")?;
                let rows = stmt
                    .query_map([], read_row)?
                    .collect::<rusqlite::Result<Vec<RawRow>>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(into_contact).collect()
    }

    async fn insert(&self, fields: &ContactFields) -> StoreResult<Contact> {
        let contact = fields.clone().into_contact(ContactId::generate());
        let record = contact.clone();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO contacts (id, name, phone, email) VALUES (?1, ?2, ?3, ?4)",
                params![record.id.as_str(), record.name, record.phone, record.email],
            )
            .map_err(map_write_error)?;
            Ok(())
        })
        .await?;

        Ok(contact)
    }

    async fn update_by_id(&self, id: &ContactId, fields: &ContactFields) -> StoreResult<bool> {
        let record = fields.clone().into_contact(id.clone());

        let changed = self
            .with_conn(move |conn| {
                conn.execute(
                    "UPDATE contacts SET name = ?1, phone = ?2, email = ?3 WHERE id = ?4",
                    params![record.name, record.phone, record.email, record.id.as_str()],
                )
                .map_err(map_write_error)
            })
            .await?;

        Ok(changed > 0)
    }

    async fn delete_one(&self, filter: &ContactFilter) -> StoreResult<bool> {
        let sql = format!(
            "DELETE FROM contacts WHERE rowid = (SELECT rowid FROM contacts WHERE {} = ?1 LIMIT 1)",
            column(filter.field)
        );
        let value = filter.value.clone();

        let removed = self
            .with_conn(move |conn| Ok(conn.execute(&sql, [&value])?))
            .await?;

        Ok(removed > 0)
    }
}
