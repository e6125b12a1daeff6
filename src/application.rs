//! Application layer module
//!
//! Use cases that orchestrate the domain ports, plus the request/response
//! shapes used at the HTTP boundary.

pub mod dto;
pub mod price_monitor;
pub mod purchase_service;

pub use dto::ValidationError;
pub use price_monitor::PriceMonitor;
pub use purchase_service::PurchaseService;
