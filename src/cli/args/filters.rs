//! Filter argument types for CLI commands

use chrono::NaiveDate;
use clap::Args;

use crate::client::models::{MatrixViewFilter, ProductFilters};

/// Product filters shared by every page.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Product code
    #[arg(long, short = 'c')]
    pub cod_pro: Option<i64>,

    /// Manufacturer (CRN) reference
    #[arg(long)]
    pub ref_crn: Option<String>,

    /// External reference
    #[arg(long)]
    pub ref_ext: Option<String>,

    /// Internal reference
    #[arg(long, short = 'r')]
    pub refint: Option<String>,

    /// Quality tier (OE, OEM, PMQ, PMV)
    #[arg(long, short = 'q')]
    pub qualite: Option<String>,

    /// Family code
    #[arg(long)]
    pub famille: Option<i64>,

    /// Sub-family code
    #[arg(long)]
    pub s_famille: Option<i64>,

    /// Status code (0 RAS, 1 purchase forbidden, 2 sale forbidden, 8 both)
    #[arg(long)]
    pub statut: Option<i64>,

    /// Restrict to one CRN grouping (0 = none)
    #[arg(long, default_value_t = 0, hide_default_value = true)]
    pub grouping_crn: i64,

    /// Only the exact product code, not its siblings
    #[arg(long = "single")]
    pub single_cod_pro: bool,

    /// Start date (YYYY-MM-DD)
    #[arg(long = "from")]
    pub date_from: Option<NaiveDate>,

    /// End date (YYYY-MM-DD)
    #[arg(long = "to")]
    pub date_to: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn to_filters(&self) -> ProductFilters {
        ProductFilters {
            cod_pro: self.cod_pro,
            ref_crn: self.ref_crn.clone(),
            ref_ext: self.ref_ext.clone(),
            refint: self.refint.clone(),
            qualite: self.qualite.clone(),
            famille: self.famille,
            s_famille: self.s_famille,
            statut: self.statut,
            grouping_crn: self.grouping_crn,
            single_cod_pro: self.single_cod_pro,
            date_from: self.date_from,
            date_to: self.date_to,
        }
    }
}

/// Extra criteria of the filtered matrix view.
#[derive(Args, Debug, Default, Clone)]
pub struct MatrixViewArgs {
    /// Free-text search inside the matrix
    #[arg(long)]
    pub search: Option<String>,

    /// Only products of this quality tier
    #[arg(long)]
    pub view_qualite: Option<String>,

    /// Only products of this family
    #[arg(long)]
    pub view_famille: Option<i64>,

    /// Only products with this status
    #[arg(long)]
    pub view_statut: Option<i64>,
}

impl MatrixViewArgs {
    pub fn to_filter(&self) -> MatrixViewFilter {
        let text = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        MatrixViewFilter {
            qualite: text(&self.view_qualite),
            famille: self.view_famille,
            statut: self.view_statut,
            search_term: text(&self.search),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_args_to_filters() {
        let args = FilterArgs {
            cod_pro: Some(5),
            qualite: Some("OE".into()),
            single_cod_pro: true,
            ..Default::default()
        };
        let filters = args.to_filters();
        assert_eq!(filters.cod_pro, Some(5));
        assert!(filters.single_cod_pro);
        assert_eq!(filters.grouping_crn, 0);
        assert!(filters.has_active_filters());
    }

    #[test]
    fn test_matrix_view_args_blank_search_is_empty() {
        let args = MatrixViewArgs {
            search: Some("  ".into()),
            ..Default::default()
        };
        assert!(args.to_filter().is_empty());
    }
}
