//! Site generation
//!
//! Seeded random site sets for building reproducible diagrams.

mod points;

pub use points::generate_random_points;
