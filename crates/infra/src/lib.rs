//! Infrastructure layer: item storage and message dispatch.

pub mod dispatch;
pub mod store;
pub mod workflow;

pub use dispatch::{DispatchError, DispatchRecord, Dispatcher, LogDispatcher, RecordingDispatcher};
pub use store::{InMemoryItemStore, ItemStore};
pub use workflow::ApprovalWorkflow;
