//! Background import queue.
//!
//! Callers submit work through a cloneable [`ImportHandle`]; an
//! [`ImportActor`] receives it and runs each unit on its own task, turning
//! the outcome into events and notifications.

mod handle;
mod messages;
mod runner;

pub use handle::ImportHandle;
pub use messages::{ImportMessage, ImportTask};
pub use runner::{process_import, process_refresh_all, spawn_import_actor, ImportActor};
