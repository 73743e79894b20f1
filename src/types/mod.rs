//! Public types for the Skjold API.

mod request;
mod response;

pub use request::{Request, RequestKey, RequestMode};
pub use response::{OFFLINE_STATUS_TEXT, Response};
