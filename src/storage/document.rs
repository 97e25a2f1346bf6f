//! MongoDB-backed task storage.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use super::config::DocumentSettings;
use super::{require_description, Backend, TaskStore};
use crate::error::{Result, TaskError};
use crate::model::{DocumentId, Task};

/// Task as stored in the collection.
///
/// `_id` is left out on insert so the driver assigns a fresh ObjectId.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaskDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    description: String,
}

impl TryFrom<TaskDocument> for Task<DocumentId> {
    type Error = TaskError;

    fn try_from(document: TaskDocument) -> Result<Self> {
        let id = document
            .id
            .ok_or_else(|| TaskError::storage("task document has no _id"))?;
        Ok(Task {
            id: DocumentId::from(id),
            completed: document.completed,
            description: document.description,
        })
    }
}

/// Tasks persisted in a MongoDB collection.
///
/// The collection handle is created once and shared; the driver's connection
/// pool takes care of concurrent requests.
pub struct DocumentStore {
    client: Client,
    collection: Collection<TaskDocument>,
}

impl DocumentStore {
    /// Connect and verify the server answers a ping.
    pub async fn connect(settings: &DocumentSettings) -> Result<Self> {
        let client = Client::with_uri_str(&settings.uri).await?;
        let store = Self::from_client(client, &settings.database, &settings.collection);
        store.ping().await?;
        tracing::info!(
            database = %settings.database,
            collection = %settings.collection,
            "connected to MongoDB"
        );
        Ok(store)
    }

    pub fn from_client(client: Client, database: &str, collection: &str) -> Self {
        let collection = client.database(database).collection(collection);
        Self { client, collection }
    }
}

fn missing(id: &DocumentId) -> TaskError {
    TaskError::not_found(format!("task {}", id))
}

#[async_trait]
impl TaskStore for DocumentStore {
    type Id = DocumentId;

    fn backend(&self) -> Backend {
        Backend::Document
    }

    async fn list(&self) -> Result<Vec<Task<DocumentId>>> {
        let cursor = self.collection.find(doc! {}).await?;
        let documents: Vec<TaskDocument> = cursor.try_collect().await?;
        documents.into_iter().map(Task::<DocumentId>::try_from).collect()
    }

    async fn insert(&self, description: String) -> Result<Task<DocumentId>> {
        require_description(&description)?;
        let document = TaskDocument {
            id: None,
            completed: false,
            description,
        };
        let result = self.collection.insert_one(&document).await?;
        let oid = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| TaskError::storage("inserted _id is not an ObjectId"))?;

        Ok(Task::new(DocumentId::from(oid), document.description))
    }

    async fn complete(&self, id: &DocumentId) -> Result<()> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.object_id() },
                doc! { "$set": { "completed": true } },
            )
            .await?;
        if result.matched_count == 0 {
            return Err(missing(id));
        }
        Ok(())
    }

    async fn delete(&self, id: &DocumentId) -> Result<()> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.object_id() })
            .await?;
        if result.deleted_count == 0 {
            return Err(missing(id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}
