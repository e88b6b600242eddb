//! Tubely metadata store
//!
//! PostgreSQL access to video records. The upload pipeline depends only on the
//! [`VideoRepository`] trait.

pub mod db;

pub use db::{PgVideoRepository, VideoRepository, VideoRow};
