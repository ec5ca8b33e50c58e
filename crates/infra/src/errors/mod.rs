//! Error conversions between external crates and the domain error.

mod conversions;

pub use conversions::InfraError;
