//! services/api/src/lib.rs
//!
//! Library crate for the marketplace API service. The binaries wire one of
//! the two backend implementations into the shared web surface.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
