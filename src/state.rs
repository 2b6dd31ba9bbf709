use std::sync::Arc;

use crate::services::ListService;

#[derive(Clone)]
pub struct AppState {
    pub lists: Arc<dyn ListService>,
}
