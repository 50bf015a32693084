// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route in this tier runs behind jwt_auth_middleware and checks that
// the authenticated user owns the profile named in the path before writing.

pub mod layout;
pub mod profile;
