//! Optimization service

use serde_json::json;
use std::sync::Arc;

use super::ResourceClient;
use crate::client::Transport;
use crate::client::models::{
    GroupOptimization, GroupOptimizationList, ProductFilters, SimulationResult,
};
use crate::error::Result;

/// Months projected by a simulation
pub const SIMULATION_MONTHS: u32 = 6;

#[derive(Clone)]
pub struct OptimizationService {
    client: ResourceClient,
}

impl OptimizationService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            client: ResourceClient::new(transport, "/optimization"),
        }
    }

    /// Rationalisation proposals per CRN group and quality
    pub async fn get_analysis(&self, filters: &ProductFilters) -> Result<GroupOptimizationList> {
        self.client
            .post("analysis", &[], &filters.build_payload())
            .await
    }

    /// Simulate removing the low-sales and no-sales references of a group
    pub async fn simulate(&self, group: &GroupOptimization) -> Result<SimulationResult> {
        let payload = simulation_payload(group);
        self.client.post("simulation", &[], &payload).await
    }
}

pub fn simulation_payload(group: &GroupOptimization) -> serde_json::Value {
    json!({
        "grouping_crn": group.grouping_crn,
        "qualite": group.qualite,
        "refs_to_delete": group.refs_to_delete(),
        "simulation_months": SIMULATION_MONTHS,
    })
}
