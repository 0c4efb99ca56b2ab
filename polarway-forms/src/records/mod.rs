//! Records module — serialized access to the form spreadsheet

pub mod actor;

pub use actor::{RecordActor, RecordHandle};
