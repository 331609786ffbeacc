// Requisitions, candidates, and the dashboard summary built from them.
// Backed by in-memory repositories seeded with sample data; nothing persists.

pub mod dashboard;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod seed;
