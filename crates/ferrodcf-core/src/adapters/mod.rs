//! Snapshot source adapters.

pub mod file;
pub mod fixture;

pub use file::FileSource;
pub use fixture::FixtureSource;
