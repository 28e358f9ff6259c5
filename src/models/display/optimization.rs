//! Optimization display models

use serde::Serialize;
use tabled::Tabled;

use crate::classify::ProjectionScore;
use crate::client::models::{GroupOptimization, RefOptimization};
use crate::output::formatters::{format_percentage, format_prix, or_dash, safe_fixed};
use crate::transform::GainPriority;

/// One optimization group
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct GroupOptimizationDisplay {
    #[tabled(rename = "GROUPING_CRN")]
    pub grouping_crn: i64,

    #[tabled(rename = "QUALITY")]
    pub qualite: String,

    #[tabled(rename = "REFS")]
    pub refs_total: i64,

    #[tabled(rename = "KEEP")]
    pub keep: usize,

    #[tabled(rename = "DELETE")]
    pub delete: usize,

    #[tabled(rename = "GAIN")]
    pub gain_potentiel: String,

    #[tabled(rename = "GAIN 6M")]
    pub gain_potentiel_6m: String,

    #[tabled(rename = "GROWTH")]
    pub taux_croissance: String,

    #[tabled(rename = "PRIORITY")]
    pub priority: String,

    #[tabled(rename = "PROJECTION")]
    pub projection: String,
}

impl From<&GroupOptimization> for GroupOptimizationDisplay {
    fn from(g: &GroupOptimization) -> Self {
        let projection = g
            .projection_6m
            .score()
            .map(|s| ProjectionScore::for_score(s).label().to_string())
            .unwrap_or_else(|| "-".to_string());

        Self {
            grouping_crn: g.grouping_crn,
            qualite: or_dash(Some(&g.qualite)),
            refs_total: g.refs_total,
            keep: g.refs_to_keep.len(),
            delete: g.refs_to_delete().len(),
            gain_potentiel: format_prix(Some(g.gain_potentiel)),
            gain_potentiel_6m: format_prix(Some(g.gain_potentiel_6m)),
            taux_croissance: format_percentage(Some(g.taux_croissance), 1, false),
            priority: GainPriority::for_gain(g.gain_potentiel).label().to_string(),
            projection,
        }
    }
}

/// One reference of a group, tagged with the proposed action
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct RefOptimizationDisplay {
    #[tabled(rename = "ACTION")]
    pub action: String,

    #[tabled(rename = "COD_PRO")]
    pub cod_pro: i64,

    #[tabled(rename = "REFINT")]
    pub refint: String,

    #[tabled(rename = "PURCHASE")]
    pub px_achat: String,

    #[tabled(rename = "REVENUE")]
    pub ca: String,

    #[tabled(rename = "QTY")]
    pub qte: String,

    #[tabled(rename = "GAIN/REF")]
    pub gain: String,
}

impl RefOptimizationDisplay {
    pub fn new(action: &str, r: &RefOptimization) -> Self {
        Self {
            action: action.to_string(),
            cod_pro: r.cod_pro,
            refint: or_dash(r.refint.as_deref()),
            px_achat: format_prix(Some(r.px_achat)),
            ca: format_prix(Some(r.ca)),
            qte: safe_fixed(Some(r.qte), 0),
            gain: format_prix(r.gain_potentiel_par_ref),
        }
    }

    /// Every reference of a group: kept first, then low sales, then no sales
    pub fn for_group(g: &GroupOptimization) -> Vec<Self> {
        let keep = g.refs_to_keep.iter().map(|r| Self::new("keep", r));
        let low = g
            .refs_to_delete_low_sales
            .iter()
            .map(|r| Self::new("delete (low sales)", r));
        let none = g
            .refs_to_delete_no_sales
            .iter()
            .map(|r| Self::new("delete (no sales)", r));
        keep.chain(low).chain(none).collect()
    }
}
