pub mod auth;
pub mod social;
pub mod user;
