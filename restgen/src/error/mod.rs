//! Error types raised by generated clients at runtime.

mod client_error;

pub use client_error::ClientError;
