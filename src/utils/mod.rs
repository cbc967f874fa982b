//! Request extraction and validation helpers shared by the handlers.

pub mod validate;

pub use validate::{UserId, ValidatedJson};
