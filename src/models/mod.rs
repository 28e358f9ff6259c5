//! Display models for CLI output

pub mod display;

pub use display::{
    CorrespondenceDisplay, EnrichedProductDisplay, GroupOptimizationDisplay, MatchDisplay,
    MatrixColumnDisplay, MonthlyTotalDisplay, ProductDisplay, PurchasePriceDisplay,
    QualityRevenueDisplay, RefOptimizationDisplay, ReferenceDisplay, SalesAggregateDisplay,
    SalesHistoryDisplay, StockDisplay, StockHistoryDisplay, SuggestionDisplay, codes_summary,
};
