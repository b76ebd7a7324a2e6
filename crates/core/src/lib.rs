//! Core types for movies-etl
//!
//! Record shapes shared by the SQLite source and the PostgreSQL target,
//! the raw row model both stores produce, and the mapper that turns one
//! into the other.

mod config;
mod constants;
mod entity;
mod env_config;
mod error;
mod mapper;
mod normalize;
mod records;
mod schema;
mod value;

pub use config::*;
pub use constants::*;
pub use entity::*;
pub use env_config::*;
pub use error::*;
pub use mapper::*;
pub use normalize::*;
pub use records::*;
pub use schema::*;
pub use value::*;
