//! Pipeline conversions module
//!
//! This module contains orchestration logic turning PGX inputs into per-image summaries.

mod pgx_stats;


pub use pgx_stats::PgxStatsPipeline;
