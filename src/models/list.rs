use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{REQUIRED, ValidationError};

/// Store-generated document identifier of a persisted list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(Uuid);

impl ListId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for ListId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for ListId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToDoList {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_list_id"
    )]
    pub id: Option<ListId>,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "deserialize_null_default"
    )]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_null_default"
    )]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub id: String,
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "deserialize_null_default"
    )]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Task {
    fn is_zero(&self) -> bool {
        self.id.is_empty() && self.name.is_empty() && self.description.is_none()
    }
}

impl ToDoList {
    /// Checks the list against its field rules, reporting every violation at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut invalid = ValidationError::new();

        if self.name.is_empty() {
            invalid.add("name", REQUIRED);
        }

        if self.tasks.is_empty() {
            invalid.add("tasks", REQUIRED);
        }

        for (i, task) in self.tasks.iter().enumerate() {
            if task.is_zero() {
                invalid.add(format!("tasks[{}]", i), REQUIRED);
            } else if task.name.is_empty() {
                invalid.add(format!("tasks[{}].name", i), REQUIRED);
            }
        }

        invalid.into_result()
    }

    /// Overwrites every task id with a fresh UUID.
    pub fn assign_task_ids(&mut self) {
        for task in &mut self.tasks {
            task.id = Uuid::new_v4().to_string();
        }
    }

    pub fn reset_id(&mut self) {
        self.id = None;
    }
}

// `null` reads as the empty value so it reaches validation instead of failing the decode.
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// `"id": ""` is how clients send an unsaved list, so it reads as no id.
fn deserialize_list_id<'de, D>(deserializer: D) -> Result<Option<ListId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::*;

    fn task(id: &str, name: &str) -> Task {
        Task {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
        }
    }

    fn list(name: &str, tasks: Vec<Task>) -> ToDoList {
        ToDoList {
            id: None,
            name: name.to_string(),
            description: None,
            tasks,
        }
    }

    #[test]
    fn test_valid_list_passes() {
        let l = list("Groceries", vec![task("", "Milk"), task("", "Bread")]);
        assert!(l.validate().is_ok());
    }

    #[rstest]
    #[case::empty_name(list("", vec![task("", "Milk")]), &["name"])]
    #[case::no_tasks(list("Groceries", vec![]), &["tasks"])]
    #[case::nothing(list("", vec![]), &["name", "tasks"])]
    #[case::task_without_name(list("Groceries", vec![task("", "Milk"), task("1234", "")]), &["tasks[1].name"])]
    #[case::zero_task(list("Groceries", vec![Task::default()]), &["tasks[0]"])]
    #[case::name_and_task(list("", vec![task("", ""), task("", "Bread")]), &["name", "tasks[0]"])]
    fn test_invalid_lists(#[case] l: ToDoList, #[case] expected: &[&str]) {
        let err = l.validate().expect_err("validation should fail");
        let fields: Vec<&str> = err.invalid_fields().keys().map(String::as_str).collect();
        assert_eq!(fields, expected);
        assert!(err.invalid_fields().values().all(|v| v == REQUIRED));
    }

    #[test]
    fn test_task_with_description_but_no_name() {
        let mut t = task("", "");
        t.description = Some("details".to_string());
        let err = list("Groceries", vec![t]).validate().unwrap_err();
        assert_eq!(err.invalid_fields().get("tasks[0].name").map(String::as_str), Some(REQUIRED));
    }

    #[test]
    fn test_reset_id() {
        let mut l = list("Groceries", vec![task("1234", "Milk")]);
        l.reset_id();
        assert_eq!(l.id, None);

        l.id = Some(ListId::generate());
        l.reset_id();
        assert_eq!(l.id, None);
    }

    #[test]
    fn test_assign_task_ids_overwrites_all() {
        let mut l = list(
            "Groceries",
            vec![task("1234", "Milk"), task("1234", "Bread"), task("", "Eggs")],
        );
        l.assign_task_ids();

        let ids: HashSet<&str> = l.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(!ids.contains(""));
        assert!(!ids.contains("1234"));
    }

    #[test]
    fn test_wire_shape() {
        let l = list("Groceries", vec![task("", "Milk")]);
        let json = serde_json::to_string(&l).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Groceries","description":null,"tasks":[{"id":"","name":"Milk","description":null}]}"#
        );

        let mut saved = l.clone();
        let id = ListId::generate();
        saved.id = Some(id);
        let value = serde_json::to_value(&saved).unwrap();
        assert_eq!(value["id"], id.to_string());
    }

    #[test]
    fn test_decode_request_without_ids() {
        let body = r#"{"name":"Dummy List Name", "description":null, "tasks":[{"name":"Dummy Task 1","description":null}]}"#;
        let l: ToDoList = serde_json::from_str(body).unwrap();
        assert_eq!(l.id, None);
        assert_eq!(l.tasks[0].id, "");
        assert_eq!(l.tasks[0].name, "Dummy Task 1");
    }

    #[test]
    fn test_decode_empty_id_as_none() {
        let l: ToDoList = serde_json::from_str(r#"{"id":"","name":"x"}"#).unwrap();
        assert_eq!(l.id, None);
        assert!(l.tasks.is_empty());
    }

    #[test]
    fn test_decode_null_fields_as_empty() {
        let body = r#"{"name":null,"description":null,"tasks":[{"id":null,"name":null,"description":null}]}"#;
        let l: ToDoList = serde_json::from_str(body).unwrap();
        assert_eq!(l.name, "");
        assert_eq!(l.tasks, vec![Task::default()]);

        let l: ToDoList = serde_json::from_str(r#"{"name":"x","tasks":null}"#).unwrap();
        assert!(l.tasks.is_empty());
        let err = l.validate().unwrap_err();
        assert_eq!(err.invalid_fields().get("tasks").map(String::as_str), Some(REQUIRED));
    }

    #[test]
    fn test_decode_rejects_malformed_id() {
        assert!(serde_json::from_str::<ToDoList>(r#"{"id":"not-an-id","name":"x"}"#).is_err());
    }
}
