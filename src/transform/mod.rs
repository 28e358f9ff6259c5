//! Pure transforms from raw payloads to page view models

pub mod dashboard;
pub mod matrix;
pub mod optimization;

pub use dashboard::{DashboardView, EnrichedProduct, Kpis};
pub use matrix::MatrixSummary;
pub use optimization::{GainPriority, OptimizationTotals};
