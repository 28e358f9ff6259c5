//! One service per backend resource.
//!
//! Services only build paths and payloads; status classification happens
//! once in the transport and decoding once in [`ResourceClient`].

mod base;
pub mod dashboard;
pub mod identifier;
pub mod matrix;
pub mod optimization;
pub mod product;
pub mod purchase;
pub mod sales;
pub mod stock;
pub mod suggestion;

use std::sync::Arc;

pub use base::ResourceClient;
pub use dashboard::DashboardService;
pub use identifier::IdentifierService;
pub use matrix::MatrixService;
pub use optimization::OptimizationService;
pub use product::ProductService;
pub use purchase::PurchaseService;
pub use sales::SalesService;
pub use stock::StockService;
pub use suggestion::SuggestionService;

use crate::client::Transport;

/// Every service, sharing one transport
#[derive(Clone)]
pub struct Services {
    pub dashboard: DashboardService,
    pub identifier: IdentifierService,
    pub matrix: MatrixService,
    pub optimization: OptimizationService,
    pub product: ProductService,
    pub purchase: PurchaseService,
    pub sales: SalesService,
    pub stock: StockService,
    pub suggestion: SuggestionService,
}

impl Services {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            dashboard: DashboardService::new(transport.clone()),
            identifier: IdentifierService::new(transport.clone()),
            matrix: MatrixService::new(transport.clone()),
            optimization: OptimizationService::new(transport.clone()),
            product: ProductService::new(transport.clone()),
            purchase: PurchaseService::new(transport.clone()),
            sales: SalesService::new(transport.clone()),
            stock: StockService::new(transport.clone()),
            suggestion: SuggestionService::new(transport),
        }
    }
}
