//! Domain layer for the hypermedia CRUD service.
//!
//! This crate provides:
//! - The `Entity` trait shared by every resource exposed over HTTP
//! - `Employee` and `Order` (with its `Status` lifecycle)
//! - `DomainError`, the single domain-level failure kind

pub mod employee;
pub mod entity;
pub mod error;
pub mod order;

pub use common::EntityId;
pub use employee::Employee;
pub use entity::Entity;
pub use error::DomainError;
pub use order::{Order, Status, UnknownStatus};
