//! # Gazette Infrastructure
//!
//! Concrete implementations of the ports defined in `gazette-core`: the
//! relational entity store (SeaORM over PostgreSQL), an in-memory store used
//! as a fallback and in tests, and the authentication services.
//!
//! ## Feature Flags
//!
//! - `full` (default) - everything
//! - `minimal` - in-memory store only
//! - `postgres` - PostgreSQL entity store via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

pub use database::{DatabaseConfig, MemoryStore};

#[cfg(feature = "postgres")]
pub use database::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository, connect,
};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
