//! Request and response models.
//!
//! These are the two shapes the fetch handler traffics in:
//!
//! - `Request`: intercepted request identity (method + URL), never persisted
//! - `Response`: status, origin classification and body bytes, cheaply
//!   cloneable so one copy can be stored while the other is returned

pub mod request;
pub mod response;

pub use request::{Method, Request};
pub use response::{Response, ResponseKind};
