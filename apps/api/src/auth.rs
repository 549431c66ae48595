//! Bearer token issuance and verification.

mod handlers;
mod tokens;

pub use handlers::{refresh_token_handler, token_handler};
pub use tokens::{TokenIssuer, TokenType};
