pub mod auth;

pub use auth::{ensure_owner, jwt_auth_middleware, AuthUser};
