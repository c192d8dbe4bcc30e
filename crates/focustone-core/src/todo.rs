//! In-memory todo list.
//!
//! Todos live for the lifetime of the process only. The list itself makes
//! no sound; the controller plays the completion chime when
//! [`TodoList::toggle`] reports [`Toggle::Completed`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
}

/// Outcome of [`TodoList::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// false -> true
    Completed,
    /// true -> false
    Reopened,
    NotFound,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoList {
    items: Vec<Todo>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a todo. Returns `None` when the text is blank.
    pub fn add(&mut self, text: &str) -> Option<Uuid> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let id = Uuid::new_v4();
        self.items.push(Todo {
            id,
            text: text.to_string(),
            completed: false,
        });
        Some(id)
    }

    pub fn toggle(&mut self, id: Uuid) -> Toggle {
        match self.items.iter_mut().find(|t| t.id == id) {
            Some(todo) => {
                todo.completed = !todo.completed;
                if todo.completed {
                    Toggle::Completed
                } else {
                    Toggle::Reopened
                }
            }
            None => Toggle::NotFound,
        }
    }

    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() != before
    }

    pub fn get(&self, id: Uuid) -> Option<&Todo> {
        self.items.iter().find(|t| t.id == id)
    }

    /// Todos in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Todo> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|t| t.completed).count()
    }

    pub fn remaining_count(&self) -> usize {
        self.len() - self.completed_count()
    }
}
