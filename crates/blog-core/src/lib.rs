//! # Blog Core
//!
//! The domain layer of the personal blog.
//! This crate contains the post record, its form validation, and the
//! storage port, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod form;
pub mod ports;

pub use error::DomainError;
