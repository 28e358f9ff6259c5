//! URL-style navigation to pages
//!
//! `cbmx open "/dashboard?cod_pro=123&qualite=OE"` resolves the path to a
//! page and the query string to the page's filters.

use chrono::NaiveDate;
use reqwest::Url;

use crate::client::models::ProductFilters;

/// Base used to parse relative paths; never contacted
const PARSE_BASE: &str = "http://cbmx.local";

/// A routed page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Product,
    Matrix,
    Optimization,
    NotFound,
}

impl Route {
    /// Every reachable route, in menu order
    pub fn all() -> &'static [Route] {
        &[
            Route::Dashboard,
            Route::Product,
            Route::Matrix,
            Route::Optimization,
        ]
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
            Route::Product => "/product",
            Route::Matrix => "/matrix",
            Route::Optimization => "/optimization",
            Route::NotFound => "/404",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Product => "Product analysis",
            Route::Matrix => "Product matrix",
            Route::Optimization => "Optimization",
            Route::NotFound => "Page not found",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Route::Dashboard => "Product KPIs, sales, stock and purchase prices",
            Route::Product => "Details, sales, stock and prices of one product",
            Route::Matrix => "Correspondence matrix between products and references",
            Route::Optimization => "Range rationalisation by CRN group and quality",
            Route::NotFound => "No page lives at this address",
        }
    }

    fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" | "/dashboard" => Route::Dashboard,
            "/product" => Route::Product,
            "/matrix" => Route::Matrix,
            "/optimization" => Route::Optimization,
            _ => Route::NotFound,
        }
    }
}

/// A parsed location: page plus filters from the query string
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub route: Route,
    pub filters: ProductFilters,
    /// Query keys that were not understood or had invalid values
    pub ignored: Vec<String>,
}

/// Parse `/page?key=value&...`. Unknown pages resolve to [`Route::NotFound`].
pub fn parse(location: &str) -> Location {
    let location = location.trim();
    let relative = if location.starts_with('/') {
        location.to_string()
    } else {
        format!("/{}", location)
    };

    let Ok(url) = Url::parse(&format!("{}{}", PARSE_BASE, relative)) else {
        return Location {
            route: Route::NotFound,
            filters: ProductFilters::default(),
            ignored: Vec::new(),
        };
    };

    let mut filters = ProductFilters::default();
    let mut ignored = Vec::new();

    for (key, value) in url.query_pairs() {
        if !apply_param(&mut filters, &key, &value) {
            log::debug!("Ignoring query parameter {}={}", key, value);
            ignored.push(key.into_owned());
        }
    }

    Location {
        route: Route::from_path(url.path()),
        filters,
        ignored,
    }
}

fn non_blank(value: &str) -> Option<String> {
    let v = value.trim();
    (!v.is_empty()).then(|| v.to_string())
}

fn apply_param(filters: &mut ProductFilters, key: &str, value: &str) -> bool {
    let int = || value.trim().parse::<i64>().ok();
    let date = || NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok();

    match key {
        "cod_pro" => int().map(|v| filters.cod_pro = Some(v)).is_some(),
        "famille" => int().map(|v| filters.famille = Some(v)).is_some(),
        "s_famille" => int().map(|v| filters.s_famille = Some(v)).is_some(),
        "statut" => int().map(|v| filters.statut = Some(v)).is_some(),
        "grouping_crn" => int().map(|v| filters.grouping_crn = v).is_some(),
        "ref_crn" => {
            filters.ref_crn = non_blank(value);
            true
        }
        "ref_ext" => {
            filters.ref_ext = non_blank(value);
            true
        }
        "refint" => {
            filters.refint = non_blank(value);
            true
        }
        "qualite" => {
            filters.qualite = non_blank(value);
            true
        }
        "single_cod_pro" => match value.trim() {
            "true" | "1" => {
                filters.single_cod_pro = true;
                true
            }
            "false" | "0" => {
                filters.single_cod_pro = false;
                true
            }
            _ => false,
        },
        "date_from" => date().map(|d| filters.date_from = Some(d)).is_some(),
        "date_to" => date().map(|d| filters.date_to = Some(d)).is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_dashboard() {
        assert_eq!(parse("/").route, Route::Dashboard);
        assert_eq!(parse("").route, Route::Dashboard);
        assert_eq!(parse("/dashboard/").route, Route::Dashboard);
    }

    #[test]
    fn test_known_pages() {
        for route in Route::all() {
            assert_eq!(parse(route.path()).route, *route);
        }
        assert_eq!(parse("matrix").route, Route::Matrix);
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        assert_eq!(parse("/analytics").route, Route::NotFound);
        assert_eq!(parse("/dashboard/extra").route, Route::NotFound);
    }

    #[test]
    fn test_query_string_becomes_filters() {
        let loc = parse("/dashboard?cod_pro=123&qualite=OE&single_cod_pro=true&date_from=2024-01-01");
        assert_eq!(loc.filters.cod_pro, Some(123));
        assert_eq!(loc.filters.qualite.as_deref(), Some("OE"));
        assert!(loc.filters.single_cod_pro);
        assert_eq!(loc.filters.date_from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert!(loc.ignored.is_empty());
    }

    #[test]
    fn test_query_values_are_decoded() {
        let loc = parse("/product?ref_crn=AB%20123");
        assert_eq!(loc.filters.ref_crn.as_deref(), Some("AB 123"));
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let loc = parse("/dashboard?cod_pro=abc&color=red");
        assert_eq!(loc.filters.cod_pro, None);
        assert_eq!(loc.ignored, vec!["cod_pro".to_string(), "color".to_string()]);
    }
}
