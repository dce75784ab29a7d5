//! Hook implementations

pub mod graylog;
pub mod writer;

pub use graylog::{GraylogHook, GraylogHookBuilder};
pub use writer::WriterHook;

pub use crate::core::Hook;
