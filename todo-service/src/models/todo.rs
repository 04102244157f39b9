use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A todo item as the service sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub done: bool,
}

impl Todo {
    /// Creates a todo with a fresh identifier (UUIDv4, 32 lowercase hex chars).
    pub fn new(title: String, done: bool) -> Self {
        Self {
            id: new_todo_id(),
            title,
            done,
        }
    }
}

pub fn new_todo_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Stored shape of a todo in the `todos` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoDocument {
    #[serde(rename = "_id")]
    pub id: Bson,
    #[serde(default, deserialize_with = "lenient::title")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::done")]
    pub done: bool,
}

/// Readers for documents written by other tools, where `title` may be null or
/// non-string and `done` may be any truthy value.
mod lenient {
    use mongodb::bson::Bson;
    use serde::{Deserialize, Deserializer};

    pub fn title<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Bson::deserialize(deserializer)? {
            Bson::String(title) => title,
            Bson::Null | Bson::Undefined => String::new(),
            other => other.to_string(),
        })
    }

    pub fn done<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Bson::deserialize(deserializer)? {
            Bson::Boolean(done) => done,
            Bson::Null | Bson::Undefined => false,
            Bson::Int32(n) => n != 0,
            Bson::Int64(n) => n != 0,
            Bson::Double(n) => n != 0.0,
            Bson::String(s) => !s.is_empty(),
            Bson::Array(items) => !items.is_empty(),
            Bson::Document(doc) => !doc.is_empty(),
            _ => true,
        })
    }
}

impl From<&Todo> for TodoDocument {
    fn from(todo: &Todo) -> Self {
        Self {
            id: Bson::String(todo.id.clone()),
            title: todo.title.clone(),
            done: todo.done,
        }
    }
}

impl From<TodoDocument> for Todo {
    fn from(doc: TodoDocument) -> Self {
        // Documents written by other tools may carry ObjectId keys.
        let id = match doc.id {
            Bson::String(id) => id,
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };

        Self {
            id,
            title: doc.title,
            done: doc.done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc, oid::ObjectId};

    #[test]
    fn new_todo_id_is_32_char_hex() {
        let todo = Todo::new("Buy milk".to_string(), false);

        assert_eq!(todo.id.len(), 32);
        assert!(todo.id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn new_todo_ids_are_unique() {
        let a = Todo::new("a".to_string(), false);
        let b = Todo::new("a".to_string(), false);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn document_stores_id_under_underscore_id() {
        let todo = Todo {
            id: "abc".to_string(),
            title: "Buy milk".to_string(),
            done: true,
        };

        let stored = bson::to_document(&TodoDocument::from(&todo)).unwrap();

        assert_eq!(stored, doc! { "_id": "abc", "title": "Buy milk", "done": true });
    }

    #[test]
    fn missing_fields_read_back_as_defaults() {
        let stored: TodoDocument = bson::from_document(doc! { "_id": "abc" }).unwrap();
        let todo = Todo::from(stored);

        assert_eq!(todo.id, "abc");
        assert_eq!(todo.title, "");
        assert!(!todo.done);
    }

    #[test]
    fn null_title_and_numeric_done_are_tolerated() {
        let stored: TodoDocument =
            bson::from_document(doc! { "_id": "a", "title": null, "done": 1 }).unwrap();
        let todo = Todo::from(stored);

        assert_eq!(todo.title, "");
        assert!(todo.done);
    }

    #[test]
    fn done_follows_truthiness() {
        let read = |done: Bson| -> bool {
            let stored: TodoDocument =
                bson::from_document(doc! { "_id": "a", "title": "x", "done": done }).unwrap();
            stored.done
        };

        assert!(!read(Bson::Int32(0)));
        assert!(!read(Bson::Null));
        assert!(!read(Bson::String(String::new())));
        assert!(read(Bson::Int64(2)));
        assert!(read(Bson::Double(0.5)));
        assert!(read(Bson::String("yes".to_string())));
    }

    #[test]
    fn non_string_title_is_rendered_as_text() {
        let stored: TodoDocument =
            bson::from_document(doc! { "_id": "a", "title": 42, "done": false }).unwrap();

        assert_eq!(stored.title, "42");
    }

    #[test]
    fn object_id_keys_become_hex_strings() {
        let oid = ObjectId::new();
        let stored: TodoDocument =
            bson::from_document(doc! { "_id": oid, "title": "x", "done": false }).unwrap();

        assert_eq!(Todo::from(stored).id, oid.to_hex());
    }
}
