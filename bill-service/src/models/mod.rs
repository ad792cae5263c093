//! Domain models for the bill service.

pub mod bill;

pub use bill::{Bill, BillCategory, BillSummary, CreateBill, UpdateBill};
