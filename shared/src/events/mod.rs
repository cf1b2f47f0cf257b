pub mod condition;
pub mod dispatcher;
pub mod error;
pub mod event_handler;
pub mod event_kinds;
pub mod scheduler;
