//! Dashboard KPIs and per-product enrichment

use std::collections::BTreeMap;

use serde::Serialize;

use crate::client::models::{DashboardFiche, ProductDetail, SalesHistory};

/// Headline figures of the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Kpis {
    pub total_products: usize,
    /// Sum of `ca_total` over all sales rows
    pub total_revenue: f64,
    /// Mean of `marge_percent_total`, 0 without sales
    pub average_margin: f64,
}

/// A product joined with its sales, stock and purchase figures
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichedProduct {
    #[serde(flatten)]
    pub detail: ProductDetail,
    pub ca_total: f64,
    pub quantite_total: f64,
    pub marge_percent_total: f64,
    /// Stock summed across depots
    pub stock_total: f64,
    pub px_achat_eur: f64,
    /// Weighted average cost of the first depot
    pub pmp: f64,
}

/// Sales of one month across all products
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub periode: String,
    pub ca: f64,
    pub marge: f64,
    pub quantite: f64,
}

/// Revenue of one quality tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityRevenue {
    pub qualite: String,
    pub ca_total: f64,
    pub products: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardView {
    pub kpis: Kpis,
    pub products: Vec<EnrichedProduct>,
    pub monthly: Vec<MonthlyTotal>,
    pub by_quality: Vec<QualityRevenue>,
}

/// Build the dashboard view from a product sheet
pub fn summarize(fiche: &DashboardFiche) -> DashboardView {
    let sales = &fiche.sales;

    let kpis = Kpis {
        total_products: fiche.details.len(),
        total_revenue: sales.iter().map(|s| s.ca_total).sum(),
        average_margin: if sales.is_empty() {
            0.0
        } else {
            sales.iter().map(|s| s.marge_percent_total).sum::<f64>() / sales.len() as f64
        },
    };

    let products: Vec<EnrichedProduct> = fiche
        .details
        .iter()
        .map(|detail| enrich(fiche, detail))
        .collect();

    DashboardView {
        kpis,
        by_quality: revenue_by_quality(&products),
        monthly: monthly_totals(&fiche.history),
        products,
    }
}

fn enrich(fiche: &DashboardFiche, detail: &ProductDetail) -> EnrichedProduct {
    let cod_pro = detail.cod_pro;
    let sales = fiche.sales.iter().find(|s| s.cod_pro == cod_pro);
    let mut stock = fiche.stock.iter().filter(|s| s.cod_pro == cod_pro).peekable();
    let pmp = stock.peek().and_then(|s| s.pmp).unwrap_or(0.0);
    let stock_total = stock.map(|s| s.stock).sum::<f64>();
    let px_achat_eur = fiche
        .purchase
        .iter()
        .find(|p| p.cod_pro == cod_pro)
        .and_then(|p| p.px_achat_eur)
        .unwrap_or(0.0);

    EnrichedProduct {
        detail: detail.clone(),
        ca_total: sales.map_or(0.0, |s| s.ca_total),
        quantite_total: sales.map_or(0.0, |s| s.quantite_total),
        marge_percent_total: sales.map_or(0.0, |s| s.marge_percent_total),
        stock_total,
        px_achat_eur,
        pmp,
    }
}

/// Sum history rows per month, oldest month first
pub fn monthly_totals(history: &[SalesHistory]) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<&str, MonthlyTotal> = BTreeMap::new();
    for row in history {
        let entry = months
            .entry(row.periode.as_str())
            .or_insert_with(|| MonthlyTotal {
                periode: row.periode.clone(),
                ..Default::default()
            });
        entry.ca += row.ca;
        entry.marge += row.marge;
        entry.quantite += row.quantite;
    }
    months.into_values().collect()
}

/// Revenue per quality tier, highest first
pub fn revenue_by_quality(products: &[EnrichedProduct]) -> Vec<QualityRevenue> {
    let mut tiers: BTreeMap<String, QualityRevenue> = BTreeMap::new();
    for p in products {
        let qualite = p
            .detail
            .qualite
            .clone()
            .unwrap_or_else(|| "N/A".to_string());
        let entry = tiers
            .entry(qualite.clone())
            .or_insert_with(|| QualityRevenue {
                qualite,
                ca_total: 0.0,
                products: 0,
            });
        entry.ca_total += p.ca_total;
        entry.products += 1;
    }
    let mut out: Vec<_> = tiers.into_values().collect();
    out.sort_by(|a, b| b.ca_total.total_cmp(&a.ca_total));
    out
}
