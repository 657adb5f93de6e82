//! HTTP request handlers, one module per resource.

pub mod health;
pub mod me;
pub mod products;
pub mod users;
