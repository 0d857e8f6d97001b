//! Business logic services.
//!
//! Services own the mutation semantics; route handlers stay thin and
//! translate between HTTP and these APIs.

pub mod auth;
pub mod cart;
pub mod email;
pub mod items;
pub mod reset;
pub mod token;
