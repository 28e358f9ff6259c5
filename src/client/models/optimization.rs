//! Optimization models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One reference inside an optimization group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefOptimization {
    pub cod_pro: i64,

    #[serde(default)]
    pub refint: Option<String>,

    #[serde(default)]
    pub px_achat: f64,

    #[serde(default)]
    pub ca: f64,

    #[serde(default)]
    pub qte: f64,

    #[serde(default)]
    pub gain_potentiel_par_ref: Option<f64>,
}

/// Monthly figures, used for both history and projection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthFigures {
    /// Month, `YYYY-MM`
    #[serde(default)]
    pub periode: String,

    #[serde(default)]
    pub qte: f64,

    #[serde(default)]
    pub ca: f64,

    #[serde(default)]
    pub marge: f64,
}

/// Six-month projection block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Projection {
    #[serde(default)]
    pub taux_croissance: f64,

    #[serde(default)]
    pub mois: Vec<MonthFigures>,

    /// Totals over the projected months (`qte`, `ca`, `marge`)
    #[serde(default)]
    pub totaux: Map<String, Value>,

    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

impl Projection {
    /// Confidence score reported by the backend, when present
    pub fn score(&self) -> Option<f64> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("score").or_else(|| m.get("confidence")))
            .and_then(Value::as_f64)
    }

    pub fn total(&self, key: &str) -> f64 {
        self.totaux.get(key).and_then(Value::as_f64).unwrap_or(0.0)
    }
}

/// Rationalisation proposal for one CRN group and quality tier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupOptimization {
    pub grouping_crn: i64,

    #[serde(default)]
    pub qualite: String,

    #[serde(default)]
    pub refs_total: i64,

    #[serde(default)]
    pub px_achat_min: f64,

    #[serde(default)]
    pub px_vente_pondere: f64,

    #[serde(default)]
    pub taux_croissance: f64,

    /// Immediate gain from rationalising the group
    #[serde(default)]
    pub gain_potentiel: f64,

    /// Projected gain over six months
    #[serde(default)]
    pub gain_potentiel_6m: f64,

    #[serde(default)]
    pub historique_6m: Vec<MonthFigures>,

    #[serde(default)]
    pub projection_6m: Projection,

    #[serde(default)]
    pub refs_to_keep: Vec<RefOptimization>,

    #[serde(default)]
    pub refs_to_delete_low_sales: Vec<RefOptimization>,

    #[serde(default)]
    pub refs_to_delete_no_sales: Vec<RefOptimization>,
}

impl GroupOptimization {
    /// Product codes proposed for removal: low sales first, then no sales.
    pub fn refs_to_delete(&self) -> Vec<i64> {
        self.refs_to_delete_low_sales
            .iter()
            .chain(self.refs_to_delete_no_sales.iter())
            .map(|r| r.cod_pro)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupOptimizationList {
    #[serde(default)]
    pub items: Vec<GroupOptimization>,
}

/// `POST /optimization/simulation` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(default)]
    pub projected_gain: f64,

    /// Anything else the backend reports
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
