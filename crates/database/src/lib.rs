//! # Fyyur Database Crate
//!
//! This crate is the persistence layer of the catalog. It owns the schema for
//! the three tables (`venues`, `artists`, `shows`) and exposes them through the
//! `CatalogStore` trait, so the listing logic never touches SQL directly.
//!
//! ## Public API
//!
//! - `connect`: builds the PostgreSQL connection pool from explicit settings.
//! - `run_migrations`: applies the embedded schema migrations.
//! - `CatalogStore`: the async persistence contract.
//! - `DbRepository`: the PostgreSQL implementation of `CatalogStore`.
//! - `InMemoryStore`: a process-local implementation with the same ordering guarantees.
//! - `seed_demo`: fills an empty store with a small demo catalog.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod seed;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use memory::InMemoryStore;
pub use repository::DbRepository;
pub use seed::seed_demo;
pub use store::CatalogStore;
