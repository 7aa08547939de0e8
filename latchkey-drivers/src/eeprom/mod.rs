//! Persistent storage implementations

pub mod at24;

pub use at24::At24;
