pub mod auth;
pub mod validate;

pub use auth::{authenticate_user, AuthUser};
