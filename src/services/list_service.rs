use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::db::ListRepository;
use crate::error::AppError;
use crate::models::ToDoList;

#[async_trait]
pub trait ListService: Send + Sync {
    async fn get_all_lists(&self) -> Result<Vec<ToDoList>, AppError>;
    async fn save_list(&self, list: ToDoList) -> Result<ToDoList, AppError>;
    async fn get_one_list_by_id(&self, id: &str) -> Result<ToDoList, AppError>;
    async fn update_one_list_by_id(&self, id: &str, list: ToDoList) -> Result<ToDoList, AppError>;
    async fn delete_list_by_id(&self, id: &str) -> Result<(), AppError>;
}

/// Passes calls through to the repository. Lists being written are validated,
/// stripped of any client-supplied id and given fresh task ids first.
pub struct DefaultListService {
    repo: Arc<dyn ListRepository>,
}

impl DefaultListService {
    pub fn new(repo: Arc<dyn ListRepository>) -> Self {
        Self { repo }
    }
}

fn normalize(list: &mut ToDoList) -> Result<(), AppError> {
    list.validate()?;
    list.reset_id();
    list.assign_task_ids();
    Ok(())
}

#[async_trait]
impl ListService for DefaultListService {
    async fn get_all_lists(&self) -> Result<Vec<ToDoList>, AppError> {
        self.repo.get_all().await
    }

    async fn save_list(&self, mut list: ToDoList) -> Result<ToDoList, AppError> {
        normalize(&mut list)?;
        debug!("saving list {:?} with {} tasks", list.name, list.tasks.len());
        self.repo.save(list).await
    }

    async fn get_one_list_by_id(&self, id: &str) -> Result<ToDoList, AppError> {
        self.repo.get_one_by_id(id).await
    }

    async fn update_one_list_by_id(&self, id: &str, mut list: ToDoList) -> Result<ToDoList, AppError> {
        normalize(&mut list)?;
        debug!("updating list {} with {} tasks", id, list.tasks.len());
        self.repo.update_one_by_id(id, list).await
    }

    async fn delete_list_by_id(&self, id: &str) -> Result<(), AppError> {
        self.repo.delete_one_by_id(id).await
    }
}
