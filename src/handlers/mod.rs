// handlers/mod.rs - Two-tier handler architecture
//
// Public (no auth): catalogs, page rendering, stateless layout checks,
// provider search. Protected (JWT + ownership): anything that writes.

pub mod protected;
pub mod public;
pub mod utils;
