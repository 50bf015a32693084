// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Read-only endpoints plus the stateless layout checks. Everything here is
// safe to serve to anonymous visitors; nothing writes.

pub mod catalog;
pub mod integrations;
pub mod layout;
pub mod pages;
pub mod profiles;
