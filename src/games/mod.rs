//! Reference games built on the core.

pub mod capture;
