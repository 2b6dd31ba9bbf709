pub mod repository;
pub mod store;

pub use repository::{ListRepository, SqliteListRepository};
pub use store::DocumentStore;
