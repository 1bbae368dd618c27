//! homework-watch - homework review status notifier
//!
//! Polls the Practicum homework-status API for the newest submitted work,
//! detects review status transitions and relays them to a Telegram chat.

pub mod api;
pub mod config;
pub mod cycle;
pub mod errors;
pub mod format;
pub mod logging;
pub mod models;
pub mod poll_loop;
pub mod response;
pub mod telegram;

pub use api::{HomeworkApi, PracticumClient};
pub use config::{check_credentials, Credentials, WatchConfig};
pub use cycle::{CycleOutcome, PollCycle};
pub use errors::{CycleError, DeliveryError, FetchError, FieldError, StructuralError};
pub use models::{LoopState, StatusCode, WorkItem};
pub use poll_loop::{LoopPhase, PollLoop};
pub use telegram::{Notifier, TelegramBot};
