//! Game implementations.

pub mod rps;
