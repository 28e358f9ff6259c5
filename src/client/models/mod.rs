//! Product explorer API data models
//!
//! Payloads mirror the backend response schemas. Unknown fields are ignored
//! and missing numeric fields default to zero, so a backend adding columns
//! never breaks decoding.

mod dashboard;
mod filters;
mod matrix;
mod optimization;
mod product;
mod sales;
mod stock;
mod suggestion;

pub use dashboard::DashboardFiche;
pub use filters::ProductFilters;
pub use matrix::{Correspondence, MatrixCell, MatrixColumnRef, MatrixView, MatrixViewFilter};
pub use optimization::{
    GroupOptimization, GroupOptimizationList, MonthFigures, Projection, RefOptimization,
    SimulationResult,
};
pub use product::{
    CodProList, ProductDetail, ProductDetailList, ProductMatch, ProductMatchList, ProductMatrix,
    PurchasePrice, PurchasePriceList,
};
pub use sales::{SalesAggregate, SalesAggregateList, SalesHistory, SalesHistoryList};
pub use stock::{StockHistoryItem, StockHistoryList, StockItem, StockList};
pub use suggestion::{RefintCodproSuggestion, SuggestionResponse};
