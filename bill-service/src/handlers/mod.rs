//! HTTP handlers for the bill service.

pub mod bills;
pub mod tips;
