//! Services module for bill-service.

pub mod advisor;
pub mod metrics;
pub mod prompt;
pub mod providers;
pub mod store;

pub use advisor::{GenerationError, TipAdvisor, TipGate, TipPhase, TipRequest, build_tip_request};
pub use metrics::{
    get_metrics, init_metrics, record_bill_operation, record_tip_generation,
    record_tip_generation_duration,
};
pub use store::BillStore;
