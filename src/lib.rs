pub mod config;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod kpi;
pub mod log_reader;
pub mod logging;
pub mod metrics;
pub mod rates;
pub mod server;
pub mod service;
pub mod slices;
pub mod store;
pub mod summary;
pub mod synth;

pub use error::{KpiError, Result};
pub use kpi::{MobilityKpis, NfType, SessionKpis, SliceCounts};
pub use service::KpiService;
pub use store::{KpiStore, Partition};
