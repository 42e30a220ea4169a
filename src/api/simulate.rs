use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::info;

use super::error::ApiError;
use crate::{
    simulation::{SimulationParams, SimulationResult},
    state::AppState,
};

/// POST /simulate - Evaluate a policy against the current outdoor temperature
pub async fn simulate_policy(
    State(st): State<AppState>,
    payload: Result<Json<SimulationParams>, JsonRejection>,
) -> Result<Json<SimulationResult>, ApiError> {
    let Json(params) = payload?;

    let outdoor_temp = st.weather.fetch_outdoor_temperature().await;
    let result = st.simulator.simulate(&params, outdoor_temp);

    if let Some(field) = result.non_finite_field() {
        return Err(ApiError::Internal(format!(
            "Out of range float value for {field}, result is not JSON compliant"
        )));
    }

    info!(
        ac_temp = params.ac_temp,
        reduction_percent = params.reduction_percent,
        incentive = params.incentive_enabled,
        outdoor_temp,
        energy_saved_kwh = result.energy_saved,
        "policy simulated"
    );

    Ok(Json(result))
}
