//! Wire-level types exchanged with the platform

pub mod envelope;
pub mod params;
pub mod x12;

pub use envelope::Envelope;
pub use params::Params;
pub use x12::X12File;
