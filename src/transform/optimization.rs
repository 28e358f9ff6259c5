//! Optimization page filtering, totals and gain buckets

use std::collections::BTreeMap;

use serde::Serialize;

use crate::client::models::GroupOptimization;

/// Keep groups whose CRN grouping contains `grouping` and whose quality
/// contains `qualite` (case-insensitive). Empty criteria match everything.
pub fn filter_groups(
    items: &[GroupOptimization],
    grouping: Option<&str>,
    qualite: Option<&str>,
) -> Vec<GroupOptimization> {
    let grouping = grouping.map(str::trim).filter(|s| !s.is_empty());
    let qualite = qualite
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    items
        .iter()
        .filter(|item| grouping.is_none_or(|g| item.grouping_crn.to_string().contains(g)))
        .filter(|item| {
            qualite
                .as_deref()
                .is_none_or(|q| item.qualite.to_lowercase().contains(q))
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptimizationTotals {
    pub total_groups: usize,
    pub total_gain_immediat: f64,
    pub total_gain_6m: f64,
    pub total_refs: i64,
    pub avg_taux_croissance: f64,
}

pub fn totals(items: &[GroupOptimization]) -> OptimizationTotals {
    let n = items.len();
    OptimizationTotals {
        total_groups: n,
        total_gain_immediat: items.iter().map(|i| i.gain_potentiel).sum(),
        total_gain_6m: items.iter().map(|i| i.gain_potentiel_6m).sum(),
        total_refs: items.iter().map(|i| i.refs_total).sum(),
        avg_taux_croissance: if n == 0 {
            0.0
        } else {
            items.iter().map(|i| i.taux_croissance).sum::<f64>() / n as f64
        },
    }
}

/// Totals per quality tier, in tier name order
pub fn group_by_qualite(items: &[GroupOptimization]) -> Vec<(String, OptimizationTotals)> {
    let mut tiers: BTreeMap<&str, Vec<GroupOptimization>> = BTreeMap::new();
    for item in items {
        tiers.entry(item.qualite.as_str()).or_default().push(item.clone());
    }
    tiers
        .into_iter()
        .map(|(qualite, groups)| (qualite.to_string(), totals(&groups)))
        .collect()
}

/// Priority of a group by its immediate gain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum GainPriority {
    High,
    Medium,
    Low,
    None,
}

impl GainPriority {
    /// Lower bound (inclusive) of the High and Medium buckets. Any other
    /// positive gain is Low; zero, negative or NaN is None.
    pub const THRESHOLDS: [(f64, GainPriority); 2] = [
        (10_000.0, GainPriority::High),
        (1_000.0, GainPriority::Medium),
    ];

    pub fn for_gain(gain: f64) -> Self {
        match Self::THRESHOLDS.iter().find(|(bound, _)| gain >= *bound) {
            Some((_, priority)) => *priority,
            None if gain > 0.0 => GainPriority::Low,
            None => GainPriority::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GainPriority::High => "High",
            GainPriority::Medium => "Medium",
            GainPriority::Low => "Low",
            GainPriority::None => "None",
        }
    }
}

/// Groups bucketed by gain priority, buckets in priority order
pub fn bucket_by_gain(
    items: &[GroupOptimization],
) -> BTreeMap<GainPriority, Vec<GroupOptimization>> {
    let mut buckets: BTreeMap<GainPriority, Vec<GroupOptimization>> = BTreeMap::new();
    for item in items {
        buckets
            .entry(GainPriority::for_gain(item.gain_potentiel))
            .or_default()
            .push(item.clone());
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(grouping_crn: i64, qualite: &str, gain: f64) -> GroupOptimization {
        GroupOptimization {
            grouping_crn,
            qualite: qualite.to_string(),
            gain_potentiel: gain,
            gain_potentiel_6m: gain * 6.0,
            refs_total: 3,
            taux_croissance: 0.1,
            ..Default::default()
        }
    }

    #[test]
    fn test_filter_by_grouping_substring() {
        let items = vec![group(12345, "OEM", 1.0), group(999, "OEM", 1.0)];
        let out = filter_groups(&items, Some("234"), None);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].grouping_crn, 12345);
    }

    #[test]
    fn test_filter_by_qualite_case_insensitive() {
        let items = vec![group(1, "OEM", 1.0), group(2, "PMQ", 1.0)];
        assert_eq!(filter_groups(&items, None, Some("oe")).len(), 1);
        assert_eq!(filter_groups(&items, Some(""), Some(" ")).len(), 2);
    }

    #[test]
    fn test_totals() {
        let items = vec![group(1, "OEM", 100.0), group(2, "PMV", 50.0)];
        let t = totals(&items);
        assert_eq!(t.total_groups, 2);
        assert_eq!(t.total_gain_immediat, 150.0);
        assert_eq!(t.total_gain_6m, 900.0);
        assert_eq!(t.total_refs, 6);
        assert!((t.avg_taux_croissance - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_totals_empty() {
        assert_eq!(totals(&[]), OptimizationTotals::default());
    }

    #[test]
    fn test_group_by_qualite() {
        let items = vec![
            group(1, "PMV", 10.0),
            group(2, "OEM", 20.0),
            group(3, "PMV", 5.0),
        ];
        let tiers = group_by_qualite(&items);
        assert_eq!(tiers[0].0, "OEM");
        assert_eq!(tiers[1].1.total_groups, 2);
        assert_eq!(tiers[1].1.total_gain_immediat, 15.0);
    }

    #[test]
    fn test_gain_priority_boundaries() {
        assert_eq!(GainPriority::for_gain(10_000.0), GainPriority::High);
        assert_eq!(GainPriority::for_gain(9_999.99), GainPriority::Medium);
        assert_eq!(GainPriority::for_gain(1_000.0), GainPriority::Medium);
        assert_eq!(GainPriority::for_gain(999.99), GainPriority::Low);
        assert_eq!(GainPriority::for_gain(0.01), GainPriority::Low);
        assert_eq!(GainPriority::for_gain(f64::MIN_POSITIVE / 2.0), GainPriority::Low);
        assert_eq!(GainPriority::for_gain(0.0), GainPriority::None);
        assert_eq!(GainPriority::for_gain(-5.0), GainPriority::None);
        assert_eq!(GainPriority::for_gain(f64::NAN), GainPriority::None);
    }

    #[test]
    fn test_bucket_by_gain() {
        let items = vec![group(1, "OE", 20_000.0), group(2, "OE", 0.0), group(3, "OE", 50.0)];
        let buckets = bucket_by_gain(&items);
        assert_eq!(buckets[&GainPriority::High].len(), 1);
        assert_eq!(buckets[&GainPriority::Low][0].grouping_crn, 3);
        assert_eq!(buckets.keys().last(), Some(&GainPriority::None));
    }
}
