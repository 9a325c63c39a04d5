//! Client for the refactor-analysis HTTP service.
//!
//! The service exposes seven JSON endpoints under `/api/analysis/`: six
//! reads (overview, findings, functions, magic-numbers, file-stats,
//! raw-pointers) and one mutating refresh that re-runs the analysis
//! server-side.
//!
//! [`AnalysisApi`] is the seam the dashboard controller is built against;
//! [`HttpAnalysisClient`] is the production implementation over `ureq`.
//! Tests swap in scripted fakes instead of standing up a server.

pub mod http;
pub mod models;

use anyhow::Result;

pub use http::HttpAnalysisClient;
pub use models::{
    FileStatsReport, Finding, FindingsReport, FunctionRecord, MagicNumberRecord, Overview,
    RawPointerReport, RefreshOutcome, severity_rank,
};

/// Typed access to the analysis service.
///
/// Every method performs one request and either returns the decoded body or
/// an error. Two failure channels collapse into `Err` here: transport
/// problems (connect, timeout, non-JSON body) and application-level failures
/// the service signals via an `error` field in the body. Callers decide
/// which failures abort a load cycle and which are isolated.
pub trait AnalysisApi {
    fn fetch_overview(&self) -> Result<Overview>;
    fn fetch_findings(&self) -> Result<FindingsReport>;
    fn fetch_functions(&self) -> Result<Vec<FunctionRecord>>;
    fn fetch_magic_numbers(&self) -> Result<Vec<MagicNumberRecord>>;
    fn fetch_file_stats(&self) -> Result<FileStatsReport>;
    fn fetch_raw_pointers(&self) -> Result<RawPointerReport>;

    /// Trigger a fresh analysis run server-side. Blocks until the service
    /// has re-analyzed (the service recomputes synchronously).
    fn trigger_refresh(&self) -> Result<RefreshOutcome>;
}
