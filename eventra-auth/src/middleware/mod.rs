pub mod auth;
pub mod origin;

pub use auth::{bearer_token, token_authentication_middleware, AuthUser};
pub use origin::origin_validation_middleware;
