mod models;
mod protocol;

pub use models::{TokenRecord, TokenResponse};
pub use protocol::{Message, Response};
