//! Product filter criteria shared by every page

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Criteria narrowing a query.
///
/// Pages never mutate a filter in place: an edit produces a new value,
/// which changes the cache key and triggers a fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cod_pro: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_crn: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_ext: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refint: Option<String>,

    /// Quality tier (OE, OEM, PMQ, PMV)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualite: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub famille: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s_famille: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statut: Option<i64>,

    /// Restrict to one CRN grouping; 0 means no grouping
    #[serde(default)]
    pub grouping_crn: i64,

    /// Only return the exact `cod_pro`, not its siblings
    #[serde(default)]
    pub single_cod_pro: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ProductFilters {
    /// Filters for a single product code
    pub fn for_cod_pro(cod_pro: i64) -> Self {
        Self {
            cod_pro: Some(cod_pro),
            ..Default::default()
        }
    }

    /// True when at least one identifying or narrowing criterion is set.
    pub fn has_active_filters(&self) -> bool {
        self.cod_pro.is_some()
            || non_empty(&self.ref_crn).is_some()
            || non_empty(&self.ref_ext).is_some()
            || non_empty(&self.refint).is_some()
            || non_empty(&self.qualite).is_some()
            || self.famille.is_some()
            || self.s_famille.is_some()
            || self.statut.is_some()
            || self.date_from.is_some()
            || self.date_to.is_some()
            || self.grouping_crn != 0
            || self.single_cod_pro
    }

    /// Request body: only criteria that are set, plus `grouping_crn` and
    /// `single_cod_pro` which are always sent.
    pub fn build_payload(&self) -> Value {
        let mut payload = Map::new();

        if let Some(cod_pro) = self.cod_pro {
            payload.insert("cod_pro".into(), json!(cod_pro));
        }
        if let Some(v) = non_empty(&self.ref_crn) {
            payload.insert("ref_crn".into(), json!(v));
        }
        if let Some(v) = non_empty(&self.ref_ext) {
            payload.insert("ref_ext".into(), json!(v));
        }
        if let Some(v) = non_empty(&self.qualite) {
            payload.insert("qualite".into(), json!(v));
        }
        if let Some(v) = non_empty(&self.refint) {
            payload.insert("refint".into(), json!(v));
        }
        if let Some(v) = self.famille {
            payload.insert("famille".into(), json!(v));
        }
        if let Some(v) = self.s_famille {
            payload.insert("s_famille".into(), json!(v));
        }
        if let Some(v) = self.statut {
            payload.insert("statut".into(), json!(v));
        }
        if let Some(d) = self.date_from {
            payload.insert("date_from".into(), json!(d.to_string()));
        }
        if let Some(d) = self.date_to {
            payload.insert("date_to".into(), json!(d.to_string()));
        }

        payload.insert("grouping_crn".into(), json!(self.grouping_crn));
        payload.insert("single_cod_pro".into(), json!(self.single_cod_pro));

        Value::Object(payload)
    }

    /// Canonical key/value pairs for cache keys.
    pub fn cache_params(&self) -> Vec<(String, String)> {
        match self.build_payload() {
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| {
                    let v = match v {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (k, v)
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// One-line human summary of the active criteria, e.g. for page headers.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(c) = self.cod_pro {
            parts.push(format!("cod_pro={}", c));
        }
        for (name, value) in [
            ("refint", &self.refint),
            ("ref_crn", &self.ref_crn),
            ("ref_ext", &self.ref_ext),
            ("qualite", &self.qualite),
        ] {
            if let Some(v) = non_empty(value) {
                parts.push(format!("{}={}", name, v));
            }
        }
        for (name, value) in [
            ("famille", self.famille),
            ("s_famille", self.s_famille),
            ("statut", self.statut),
        ] {
            if let Some(v) = value {
                parts.push(format!("{}={}", name, v));
            }
        }
        if self.grouping_crn != 0 {
            parts.push(format!("grouping_crn={}", self.grouping_crn));
        }
        if self.single_cod_pro {
            parts.push("single".to_string());
        }
        match (self.date_from, self.date_to) {
            (Some(from), Some(to)) => parts.push(format!("{}..{}", from, to)),
            (Some(from), None) => parts.push(format!("from {}", from)),
            (None, Some(to)) => parts.push(format!("until {}", to)),
            (None, None) => {}
        }

        if parts.is_empty() {
            "no filters".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_active_filters() {
        assert!(!ProductFilters::default().has_active_filters());
    }

    #[test]
    fn test_blank_strings_are_not_active() {
        let filters = ProductFilters {
            refint: Some("   ".into()),
            ..Default::default()
        };
        assert!(!filters.has_active_filters());
    }

    #[test]
    fn test_each_identifier_activates() {
        assert!(ProductFilters::for_cod_pro(1).has_active_filters());
        let f = ProductFilters {
            qualite: Some("OEM".into()),
            ..Default::default()
        };
        assert!(f.has_active_filters());
    }

    #[test]
    fn test_grouping_and_single_flag_activate() {
        let grouped = ProductFilters {
            grouping_crn: 4242,
            ..Default::default()
        };
        assert!(grouped.has_active_filters());

        let single = ProductFilters {
            single_cod_pro: true,
            ..Default::default()
        };
        assert!(single.has_active_filters());
    }

    #[test]
    fn test_payload_only_contains_set_criteria() {
        let filters = ProductFilters {
            cod_pro: Some(42),
            ref_crn: Some(String::new()),
            ..Default::default()
        };
        let payload = filters.build_payload();
        assert_eq!(
            payload,
            json!({"cod_pro": 42, "grouping_crn": 0, "single_cod_pro": false})
        );
    }

    #[test]
    fn test_payload_always_has_grouping_and_single_flag() {
        let payload = ProductFilters::default().build_payload();
        assert_eq!(payload["grouping_crn"], json!(0));
        assert_eq!(payload["single_cod_pro"], json!(false));
    }

    #[test]
    fn test_payload_dates_are_iso() {
        let filters = ProductFilters {
            date_from: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        };
        assert_eq!(filters.build_payload()["date_from"], json!("2024-01-31"));
    }

    #[test]
    fn test_cache_params_stable() {
        let a = ProductFilters::for_cod_pro(7);
        assert_eq!(a.cache_params(), a.clone().cache_params());
        assert!(a.cache_params().contains(&("cod_pro".to_string(), "7".to_string())));
    }

    #[test]
    fn test_summary() {
        assert_eq!(ProductFilters::default().summary(), "no filters");
        let f = ProductFilters {
            cod_pro: Some(3),
            qualite: Some("OE".into()),
            single_cod_pro: true,
            ..Default::default()
        };
        assert_eq!(f.summary(), "cod_pro=3, qualite=OE, single");
    }
}
