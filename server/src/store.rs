//! Event persistence.
//!
//! [`EventStore`] is the seam between the HTTP layer and MongoDB: routes only
//! see the trait, so tests swap in [`MemoryStore`] and never touch a real
//! database. [`MongoStore`] is the production implementation, writing to the
//! `events` collection of the `meetly` database.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::options::{ClientOptions, Credential};
use mongodb::{Client, Collection};
use std::sync::Mutex;
use thiserror::Error;

use crate::config::Config;
use crate::events::EventDocument;

/// Database name.
const DB_NAME: &str = "meetly";

/// Collection holding event documents.
const EVENTS_COLLECTION: &str = "events";

/// Errors surfaced by the event store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The MongoDB driver reported a failure.
    #[error("{0}")]
    Mongo(#[from] mongodb::error::Error),

    /// The insert succeeded but returned an identifier of an unexpected type.
    #[error("store returned a non-ObjectId identifier")]
    UnexpectedId,

    /// Generic backend failure, used by test doubles.
    #[error("{0}")]
    Backend(String),
}

/// Storage backend for event documents.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Inserts an event and returns its store-assigned identifier.
    async fn insert_event(&self, event: EventDocument) -> Result<ObjectId, StoreError>;
}

/// MongoDB-backed event store.
pub struct MongoStore {
    events: Collection<EventDocument>,
}

impl MongoStore {
    /// Connects to MongoDB using the configured URI and optional credentials.
    ///
    /// Credentials are only attached when both `DB_USER` and `DB_PASS` are
    /// set; otherwise the connection string is used as-is.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Mongo`] if the connection string cannot be
    /// parsed or the client cannot be created.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(&config.db_uri).await?;

        if let (Some(user), Some(pass)) = (&config.db_user, &config.db_pass) {
            options.credential = Some(
                Credential::builder()
                    .username(user.clone())
                    .password(pass.clone())
                    .build(),
            );
        }

        let client = Client::with_options(options)?;
        let events = client.database(DB_NAME).collection(EVENTS_COLLECTION);

        Ok(Self { events })
    }

    /// Wraps an existing collection handle. Useful for testing against a
    /// dedicated database.
    #[must_use]
    pub fn with_collection(events: Collection<EventDocument>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl EventStore for MongoStore {
    async fn insert_event(&self, event: EventDocument) -> Result<ObjectId, StoreError> {
        let result = self.events.insert_one(event).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or(StoreError::UnexpectedId)
    }
}

/// In-memory event store for tests.
///
/// Assigns a fresh `ObjectId` per insert and retains every document so tests
/// can assert on what was written. The `failing` constructor simulates a
/// backend outage.
pub struct MemoryStore {
    events: Mutex<Vec<EventDocument>>,
    failure: Option<String>,
}

impl MemoryStore {
    /// Creates an empty store that accepts every insert.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    /// Creates a store that rejects every insert with the given message.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    /// Returns a snapshot of the stored documents.
    #[must_use]
    pub fn events(&self) -> Vec<EventDocument> {
        self.events.lock().unwrap().clone()
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert_event(&self, event: EventDocument) -> Result<ObjectId, StoreError> {
        if let Some(message) = &self.failure {
            return Err(StoreError::Backend(message.clone()));
        }

        let id = ObjectId::new();
        let mut stored = event;
        stored.id = Some(id);
        self.events.lock().unwrap().push(stored);
        Ok(id)
    }
}
