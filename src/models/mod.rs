//! Models Module
//!
//! Request and response DTOs for the cache server REST API.

pub mod requests;
pub mod responses;

pub use requests::{GetValueParams, PutValueParams};
pub use responses::{ErrorResponse, MessageResponse, ValueResponse};
