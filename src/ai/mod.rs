//! Remote audit backends
//!
//! - `gateway`: calls the reasoning service directly with the methodology
//!   prompt and a forced `report_audit_findings` tool call
//! - `function_client`: uploads the batch to the hosted audit function

pub mod credentials;
pub mod function_client;
pub mod gateway;
pub mod http_client;
pub mod prompts;
pub mod tools;
pub mod wire;

pub use function_client::FunctionAuditor;
pub use gateway::{interpret_gateway_response, GatewayAuditor, MANUAL_REVIEW_SUMMARY};
pub use wire::{AuditResponse, ErrorBody};
