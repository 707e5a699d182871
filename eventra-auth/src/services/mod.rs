pub mod auth;
pub mod blacklist;
pub mod error;
pub mod jwt;
pub mod policy;
pub mod store;

pub use auth::AuthService;
pub use blacklist::{InMemoryRevocationList, TokenRevocationList};
pub use error::ServiceError;
pub use jwt::{JwtService, TokenClaims};
pub use policy::{PolicyError, PolicyService};
pub use store::{InMemoryUserStore, PgUserStore, UserStore};
