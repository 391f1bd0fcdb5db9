//! Shared types for loginguard.
//!
//! Holds the persisted settings model, the resolved configuration and the
//! objects exchanged with the host application and the presentation layer.
//! Nothing in here performs I/O.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod objects;
