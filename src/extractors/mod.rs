//! Request extractors: forced JSON object bodies, integer path ids, and the maintenance token header.

pub mod init_token;
pub mod json;
pub mod path;

pub use init_token::{InitToken, INIT_TOKEN_HEADER};
pub use json::JsonBody;
pub use path::IdPath;
