// handlers/mod.rs - HTTP handlers
//
// Public (no auth): service info, health, reads, exhibition room creation
// Protected (bearer token): every other mutation
// The tier a handler belongs to is decided by the router in app.rs.

pub mod resource;
pub mod system;
