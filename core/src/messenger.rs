//! Bounded hand-off between a controller and a running engine.
//!
//! Two small queues, one per direction: parameter updates flow to the engine,
//! which drains them at its own checkpoints, and stop signals flow back to the
//! controller, which polls them without blocking. A full queue means one side
//! stopped consuming, so pushes fail instead of buffering a backlog.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

pub const QUEUE_CAPACITY: usize = 10;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessengerError {
    #[error("queue is full ({capacity} unconsumed messages)")]
    QueueFull { capacity: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateValue {
    Int(i64),
    Bool(bool),
    Text(String),
}

impl UpdateValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, UpdateValue::Text(text) if text.trim().is_empty())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            UpdateValue::Int(value) => Some(*value),
            UpdateValue::Text(text) => text.trim().parse().ok(),
            UpdateValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            UpdateValue::Bool(value) => Some(*value),
            UpdateValue::Int(0) => Some(false),
            UpdateValue::Int(1) => Some(true),
            UpdateValue::Int(_) => None,
            UpdateValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
        }
    }
}

impl From<i64> for UpdateValue {
    fn from(value: i64) -> Self {
        UpdateValue::Int(value)
    }
}

impl From<i32> for UpdateValue {
    fn from(value: i32) -> Self {
        UpdateValue::Int(value.into())
    }
}

impl From<bool> for UpdateValue {
    fn from(value: bool) -> Self {
        UpdateValue::Bool(value)
    }
}

impl From<&str> for UpdateValue {
    fn from(value: &str) -> Self {
        UpdateValue::Text(value.to_string())
    }
}

impl From<String> for UpdateValue {
    fn from(value: String) -> Self {
        UpdateValue::Text(value)
    }
}

impl fmt::Display for UpdateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateValue::Int(value) => write!(f, "{value}"),
            UpdateValue::Bool(value) => write!(f, "{value}"),
            UpdateValue::Text(value) => write!(f, "{value:?}"),
        }
    }
}

/// A `(parameter_name, new_value)` pair for a running engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamUpdate {
    pub name: String,
    pub value: UpdateValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSignal {
    Stopped,
}

#[derive(Debug)]
struct BoundedQueue<T> {
    items: Mutex<VecDeque<T>>,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    fn new(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    fn push(&self, item: T) -> Result<(), MessengerError> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        if items.len() >= self.capacity {
            return Err(MessengerError::QueueFull {
                capacity: self.capacity,
            });
        }
        items.push_back(item);
        Ok(())
    }

    fn pop(&self) -> Option<T> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    fn is_empty(&self) -> bool {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

#[derive(Debug)]
pub struct InterThreadMessenger {
    updates: BoundedQueue<ParamUpdate>,
    signals: BoundedQueue<EngineSignal>,
}

impl Default for InterThreadMessenger {
    fn default() -> Self {
        Self::new()
    }
}

impl InterThreadMessenger {
    pub fn new() -> Self {
        Self::with_capacity(QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            updates: BoundedQueue::new(capacity),
            signals: BoundedQueue::new(capacity),
        }
    }

    /// Controller side. Fails when the engine left too many updates unread.
    pub fn send_update(
        &self,
        name: &str,
        value: impl Into<UpdateValue>,
    ) -> Result<(), MessengerError> {
        self.updates.push(ParamUpdate {
            name: name.to_string(),
            value: value.into(),
        })
    }

    pub fn has_update(&self) -> bool {
        !self.updates.is_empty()
    }

    /// Engine side, never blocks.
    pub fn take_update(&self) -> Option<ParamUpdate> {
        self.updates.pop()
    }

    pub fn notify_stopped(&self) -> Result<(), MessengerError> {
        self.signals.push(EngineSignal::Stopped)
    }

    /// Controller side, never blocks. Consumes the signal it reports.
    pub fn check_stopped(&self) -> bool {
        matches!(self.signals.pop(), Some(EngineSignal::Stopped))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
