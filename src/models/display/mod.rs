//! Display model implementations for table and JSON output
//!
//! Display models turn API payloads into rows with French-formatted
//! figures and upper-case column names.

mod matrix;
mod optimization;
mod product;
mod sales;
mod stock;
mod suggestion;

pub use matrix::{CorrespondenceDisplay, MatrixColumnDisplay};
pub use optimization::{GroupOptimizationDisplay, RefOptimizationDisplay};
pub use product::{
    EnrichedProductDisplay, MatchDisplay, ProductDisplay, PurchasePriceDisplay, codes_summary,
};
pub use sales::{
    MonthlyTotalDisplay, QualityRevenueDisplay, SalesAggregateDisplay, SalesHistoryDisplay,
};
pub use stock::{StockDisplay, StockHistoryDisplay};
pub use suggestion::{ReferenceDisplay, SuggestionDisplay};
