//! PrintRelay server library.
//!
//! Exposes the host's CUPS printers over HTTP: printer listing, selection of a
//! default printer, and printing of uploaded documents.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
