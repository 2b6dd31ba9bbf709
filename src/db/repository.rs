use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, SqliteConnection};
use tracing::error;
use uuid::Uuid;

use crate::db::store::DocumentStore;
use crate::error::AppError;
use crate::models::{ListId, Task, ToDoList};

#[async_trait]
pub trait ListRepository: Send + Sync {
    async fn get_all(&self) -> Result<Vec<ToDoList>, AppError>;
    async fn get_one_by_id(&self, id: &str) -> Result<ToDoList, AppError>;
    async fn update_one_by_id(&self, id: &str, list: ToDoList) -> Result<ToDoList, AppError>;
    async fn save(&self, list: ToDoList) -> Result<ToDoList, AppError>;
    async fn delete_one_by_id(&self, id: &str) -> Result<(), AppError>;
}

/// Stored body of a list; the id lives in its own column.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ListDocument {
    name: String,
    description: Option<String>,
    tasks: Vec<Task>,
}

impl From<&ToDoList> for ListDocument {
    fn from(list: &ToDoList) -> Self {
        Self {
            name: list.name.clone(),
            description: list.description.clone(),
            tasks: list.tasks.clone(),
        }
    }
}

#[derive(FromRow)]
struct ListRow {
    id: Uuid,
    document: Json<ListDocument>,
}

impl From<ListRow> for ToDoList {
    fn from(row: ListRow) -> Self {
        let Json(doc) = row.document;
        ToDoList {
            id: Some(ListId::from(row.id)),
            name: doc.name,
            description: doc.description,
            tasks: doc.tasks,
        }
    }
}

pub struct SqliteListRepository {
    store: DocumentStore,
}

impl SqliteListRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }
}

fn parse_id(id: &str) -> Result<ListId, AppError> {
    id.parse().map_err(|e| {
        error!("error parsing id {}: {}", id, e);
        AppError::invalid_id()
    })
}

fn query_error(e: sqlx::Error) -> AppError {
    error!("error querying database: {}", e);
    AppError::database()
}

async fn fetch_all(conn: &mut SqliteConnection) -> Result<Vec<ToDoList>, AppError> {
    let rows = sqlx::query_as::<_, ListRow>("SELECT id, document FROM lists ORDER BY rowid")
        .fetch_all(&mut *conn)
        .await
        .map_err(query_error)?;

    Ok(rows.into_iter().map(ToDoList::from).collect())
}

async fn fetch_one(conn: &mut SqliteConnection, id: ListId) -> Result<Option<ToDoList>, AppError> {
    let row = sqlx::query_as::<_, ListRow>("SELECT id, document FROM lists WHERE id = ?")
        .bind(id.as_uuid())
        .fetch_optional(&mut *conn)
        .await
        .map_err(query_error)?;

    Ok(row.map(ToDoList::from))
}

async fn insert(conn: &mut SqliteConnection, list: &ToDoList) -> Result<ListId, AppError> {
    let id = ListId::generate();
    sqlx::query("INSERT INTO lists (id, document) VALUES (?, ?)")
        .bind(id.as_uuid())
        .bind(Json(ListDocument::from(list)))
        .execute(&mut *conn)
        .await
        .map_err(query_error)?;

    Ok(id)
}

async fn replace(conn: &mut SqliteConnection, id: ListId, list: &ToDoList) -> Result<u64, AppError> {
    let matched = sqlx::query("UPDATE lists SET document = ? WHERE id = ?")
        .bind(Json(ListDocument::from(list)))
        .bind(id.as_uuid())
        .execute(&mut *conn)
        .await
        .map_err(query_error)?
        .rows_affected();

    Ok(matched)
}

async fn remove(conn: &mut SqliteConnection, id: ListId) -> Result<u64, AppError> {
    let deleted = sqlx::query("DELETE FROM lists WHERE id = ?")
        .bind(id.as_uuid())
        .execute(&mut *conn)
        .await
        .map_err(query_error)?
        .rows_affected();

    Ok(deleted)
}

#[async_trait]
impl ListRepository for SqliteListRepository {
    async fn get_all(&self) -> Result<Vec<ToDoList>, AppError> {
        let mut conn = self.store.connect().await?;
        let result = fetch_all(&mut conn).await;
        self.store.release(conn).await;
        result
    }

    async fn get_one_by_id(&self, id: &str) -> Result<ToDoList, AppError> {
        let list_id = parse_id(id)?;

        let mut conn = self.store.connect().await?;
        let result = fetch_one(&mut conn, list_id).await;
        self.store.release(conn).await;

        result?.ok_or_else(|| AppError::no_match(id))
    }

    /// Replaces name, description and tasks of an existing list. Never inserts.
    async fn update_one_by_id(&self, id: &str, mut list: ToDoList) -> Result<ToDoList, AppError> {
        let list_id = parse_id(id)?;

        let mut conn = self.store.connect().await?;
        let result = replace(&mut conn, list_id, &list).await;
        self.store.release(conn).await;

        if result? == 0 {
            return Err(AppError::no_match(id));
        }

        list.id = Some(list_id);
        Ok(list)
    }

    async fn save(&self, mut list: ToDoList) -> Result<ToDoList, AppError> {
        let mut conn = self.store.connect().await?;
        let result = insert(&mut conn, &list).await;
        self.store.release(conn).await;

        list.id = Some(result?);
        Ok(list)
    }

    async fn delete_one_by_id(&self, id: &str) -> Result<(), AppError> {
        let list_id = parse_id(id)?;

        let mut conn = self.store.connect().await?;
        let result = remove(&mut conn, list_id).await;
        self.store.release(conn).await;

        if result? == 0 {
            return Err(AppError::no_match(id));
        }
        Ok(())
    }
}
