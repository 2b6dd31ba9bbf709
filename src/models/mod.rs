pub mod list;

pub use list::{ListId, Task, ToDoList};
