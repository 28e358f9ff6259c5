//! Optimization pages: rationalisation proposals per CRN group and the
//! removal simulation

use std::collections::BTreeMap;

use colored::Colorize;
use serde_json::{Value, json};

use crate::cache::CacheTtl;
use crate::classify::Level;
use crate::cli::page::{self, Page};
use crate::cli::{CommandContext, OutputFormat, layout};
use crate::client::models::{GroupOptimization, GroupOptimizationList, ProductFilters};
use crate::error::{ApiError, Error, Result};
use crate::models::{GroupOptimizationDisplay, RefOptimizationDisplay};
use crate::output::Formattable;
use crate::output::formatters::{format_currency, format_percentage, format_prix};
use crate::output::table::format_pairs;
use crate::query::FeatureQuery;
use crate::transform::optimization::{
    GainPriority, OptimizationTotals, bucket_by_gain, filter_groups, group_by_qualite, totals,
};

/// Cache feature shared by the analysis and invalidated by simulations
pub const FEATURE: &str = "optimization";

pub const ANALYSIS: Page = Page::new(FEATURE, "Optimization", "optimisation");
const SIMULATION: Page = Page::new(FEATURE, "Optimization simulation", "simulation");

/// Narrowing and extra views of the analysis page
#[derive(Debug, Clone, Default)]
pub struct AnalysisView {
    pub group: Option<String>,
    pub quality: Option<String>,
    pub by_quality: bool,
    pub refs: Option<i64>,
}

fn totals_pairs(t: &OptimizationTotals) -> Vec<(&'static str, String)> {
    vec![
        ("Groups", t.total_groups.to_string()),
        ("Immediate gain", format_currency(Some(t.total_gain_immediat), true)),
        ("6-month gain", format_currency(Some(t.total_gain_6m), true)),
        ("References", t.total_refs.to_string()),
        (
            "Average growth",
            format_percentage(Some(t.avg_taux_croissance), 1, false),
        ),
    ]
}

/// Flat row per group, for export
fn export_row(g: &GroupOptimization) -> Value {
    json!({
        "grouping_crn": g.grouping_crn,
        "qualite": g.qualite,
        "refs_total": g.refs_total,
        "refs_to_keep": g.refs_to_keep.len(),
        "refs_to_delete": g.refs_to_delete().len(),
        "prix_achat_min": g.px_achat_min,
        "prix_vente_pondere": g.px_vente_pondere,
        "gain_potentiel": g.gain_potentiel,
        "gain_potentiel_6m": g.gain_potentiel_6m,
        "taux_croissance": g.taux_croissance,
        "priorite": GainPriority::for_gain(g.gain_potentiel).label(),
    })
}

fn priority_level(priority: GainPriority) -> Level {
    match priority {
        GainPriority::High => Level::High,
        GainPriority::Medium => Level::Medium,
        GainPriority::Low => Level::Low,
        GainPriority::None => Level::Unknown,
    }
}

/// Optimization groups with totals, gain buckets and proposed deletions
pub async fn analysis(
    ctx: &CommandContext,
    filters: &ProductFilters,
    view: &AnalysisView,
) -> Result<()> {
    let Some(state) = page::load(
        ctx,
        &ANALYSIS,
        filters,
        ctx.options(Some(CacheTtl::OPTIMIZATION)),
        || ctx.services.optimization.get_analysis(filters),
    )
    .await?
    else {
        return Ok(());
    };

    let mut query = FeatureQuery::new(|list: &GroupOptimizationList| {
        filter_groups(&list.items, view.group.as_deref(), view.quality.as_deref())
    });
    let Some(groups) = query.apply(&state) else {
        return Ok(());
    };
    log::debug!(
        "{} of {} optimization groups kept",
        groups.len(),
        state.data.as_ref().map_or(0, |d| d.items.len())
    );

    let summary = totals(&groups);
    let selected: Vec<&GroupOptimization> = match view.refs {
        Some(grouping) => groups.iter().filter(|g| g.grouping_crn == grouping).collect(),
        None => Vec::new(),
    };
    if let Some(grouping) = view.refs {
        if selected.is_empty() {
            return Err(ApiError::NotFound(format!("optimization group {}", grouping)).into());
        }
    }

    match ctx.format {
        OutputFormat::Json => {
            let mut data = json!({
                "items": &*groups,
                "totals": summary,
            });
            if view.by_quality {
                let tiers: BTreeMap<String, OptimizationTotals> =
                    group_by_qualite(&groups).into_iter().collect();
                data["by_quality"] = serde_json::to_value(tiers)?;
            }
            page::emit_json(&data, filters, state.from_cache)?;
        }
        OutputFormat::Table if view.refs.is_some() => {
            let rows: Vec<RefOptimizationDisplay> = selected
                .iter()
                .flat_map(|g| RefOptimizationDisplay::for_group(g))
                .collect();
            rows.print(ctx.format)?;
        }
        OutputFormat::Table => {
            let rows: Vec<GroupOptimizationDisplay> =
                groups.iter().map(GroupOptimizationDisplay::from).collect();
            rows.print(ctx.format)?;
        }
        OutputFormat::Pretty => render(&groups, &summary, view, &selected, state.from_cache)?,
    }

    let rows: Vec<Value> = groups.iter().map(export_row).collect();
    page::export_items(ctx, ANALYSIS.export_name, &rows);
    Ok(())
}

fn render(
    groups: &[GroupOptimization],
    summary: &OptimizationTotals,
    view: &AnalysisView,
    selected: &[&GroupOptimization],
    cached: bool,
) -> Result<()> {
    if groups.is_empty() {
        layout::no_data();
        return Ok(());
    }

    println!("{}", format_pairs(&totals_pairs(summary)));

    layout::section("Gain priority");
    for (priority, bucket) in bucket_by_gain(groups) {
        let label = format!("{:<8}", priority.label());
        println!(
            "  {} {} groups, {}",
            priority_level(priority).paint(&label),
            bucket.len(),
            format_prix(Some(bucket.iter().map(|g| g.gain_potentiel).sum()))
        );
    }

    if view.by_quality {
        layout::section("By quality");
        let tiers = group_by_qualite(groups);
        let pairs: Vec<(&str, String)> = tiers
            .iter()
            .map(|(qualite, t)| {
                (
                    qualite.as_str(),
                    format!(
                        "{} groups, gain {}",
                        t.total_groups,
                        format_currency(Some(t.total_gain_immediat), true)
                    ),
                )
            })
            .collect();
        println!("{}", format_pairs(&pairs));
    }

    layout::section("Groups");
    let rows: Vec<GroupOptimizationDisplay> =
        groups.iter().map(GroupOptimizationDisplay::from).collect();
    rows.print(OutputFormat::Pretty)?;

    for group in selected {
        layout::section(&format!(
            "References of group {} ({})",
            group.grouping_crn, group.qualite
        ));
        RefOptimizationDisplay::for_group(group).print(OutputFormat::Pretty)?;
    }

    if cached {
        println!();
        layout::note("(from cache)");
    }
    Ok(())
}

/// Pick the group to simulate; the quality is required when the grouping
/// has several tiers.
fn select_group<'a>(
    items: &'a [GroupOptimization],
    grouping: i64,
    quality: Option<&str>,
) -> Result<&'a GroupOptimization> {
    let candidates: Vec<&GroupOptimization> = items
        .iter()
        .filter(|g| g.grouping_crn == grouping)
        .filter(|g| quality.is_none_or(|q| g.qualite.eq_ignore_ascii_case(q.trim())))
        .collect();

    match candidates.as_slice() {
        [] => Err(ApiError::NotFound(format!("optimization group {}", grouping)).into()),
        [group] => Ok(*group),
        several => {
            let tiers: Vec<&str> = several.iter().map(|g| g.qualite.as_str()).collect();
            Err(Error::Other(format!(
                "Grouping {} has several quality tiers ({}); pass --quality",
                grouping,
                tiers.join(", ")
            )))
        }
    }
}

/// Simulate removing the proposed references of one group
pub async fn simulate(
    ctx: &CommandContext,
    filters: &ProductFilters,
    grouping: i64,
    quality: Option<&str>,
) -> Result<()> {
    let mut filters = filters.clone();
    if filters.grouping_crn == 0 {
        filters.grouping_crn = grouping;
    }

    let options = ctx
        .options(Some(CacheTtl::OPTIMIZATION))
        .without_filters();
    let pretty = ctx.format.is_pretty();
    if pretty {
        layout::header(SIMULATION.title, Some(&filters));
    }

    // Simulate against the current proposals, never a cached copy
    let spinner = layout::spinner("Loading optimization...", pretty);
    let state = ctx
        .query
        .refetch(SIMULATION.feature, &filters, options, || {
            ctx.services.optimization.get_analysis(&filters)
        })
        .await;
    spinner.finish_and_clear();
    let Some(list) = state.into_result()? else {
        return Ok(());
    };

    let group = select_group(&list.items, grouping, quality)?;
    let refs = group.refs_to_delete();

    let spinner = layout::spinner("Simulating...", ctx.format.is_pretty());
    let result = ctx.services.optimization.simulate(group).await;
    spinner.finish_and_clear();
    let result = result?;

    let removed = ctx.query.invalidate(FEATURE)?;
    log::debug!("Invalidated {} cached optimization entries", removed);

    let difference = result.projected_gain - group.gain_potentiel;

    match ctx.format {
        OutputFormat::Json => {
            let data = json!({
                "grouping_crn": group.grouping_crn,
                "qualite": group.qualite,
                "refs_to_delete": refs,
                "gain_potentiel": group.gain_potentiel,
                "projected_gain": result.projected_gain,
                "difference": difference,
                "details": result.extra,
            });
            page::emit_json(&data, &filters, false)?;
        }
        OutputFormat::Pretty | OutputFormat::Table => {
            println!(
                "{}",
                format_pairs(&[
                    ("Group", group.grouping_crn.to_string()),
                    ("Quality", group.qualite.clone()),
                    ("References removed", refs.len().to_string()),
                    ("Current gain", format_prix(Some(group.gain_potentiel))),
                    ("Projected gain", format_prix(Some(result.projected_gain))),
                ])
            );
            let text = format!("Difference: {:+.2} €", difference);
            if difference >= 0.0 {
                println!("{}", text.green());
            } else {
                println!("{}", text.red());
            }
        }
    }

    Ok(())
}
