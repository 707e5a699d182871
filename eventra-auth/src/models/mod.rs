pub mod context;
pub mod role;
pub mod user;

pub use context::AuthContext;
pub use role::{authorities_of, permissions_for, Permission, RoleName};
pub use user::User;
