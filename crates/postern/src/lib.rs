//! Postern hosting transport library.
//!
//! This library exposes the transport boundary for testing purposes.
//! The main entry point is the `postern` binary.

pub mod gateway;
