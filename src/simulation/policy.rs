//! # Policy Simulator
//!
//! Closed-form thermal and economic model for an air-conditioning policy.
//! A policy raises (or lowers) the thermostat setpoint relative to a fixed
//! baseline and optionally sheds an extra share of load. The model turns the
//! resulting change in indoor/outdoor temperature delta into monthly energy,
//! cost, carbon and comfort figures.

use serde::{Deserialize, Serialize};

/// Policy parameters supplied by the caller.
///
/// No bounds are enforced: any real setpoint or reduction flows straight
/// through the formulas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParams {
    /// Thermostat setpoint in °C
    pub ac_temp: f64,
    /// Additional load shedding in percentage points
    pub reduction_percent: f64,
    /// Whether the fixed monetary incentive applies
    pub incentive_enabled: bool,
}

/// Outcome of a policy simulation, rounded for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Monthly cost savings in currency units
    pub cost_savings: f64,
    /// Monthly carbon reduction in kg CO2e
    pub carbon_reduction: f64,
    /// Occupant comfort proxy in [0.1, 1.0]
    pub comfort_score: f64,
    /// Monthly energy saved in kWh
    pub energy_saved: f64,
    /// Outdoor temperature the simulation ran against, °C
    pub outdoor_temp: f64,
}

impl SimulationResult {
    /// Name of the first field holding NaN or an infinity, if any.
    ///
    /// Only extreme inputs (e.g. a reduction near `f64::MAX`) overflow the
    /// model; such a result cannot be represented in JSON.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        [
            ("costSavings", self.cost_savings),
            ("carbonReduction", self.carbon_reduction),
            ("comfortScore", self.comfort_score),
            ("energySaved", self.energy_saved),
            ("outdoorTemp", self.outdoor_temp),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

/// Coefficients of the thermal/economic model.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyModel {
    /// Reference setpoint the current policy is compared against, °C
    pub baseline_setpoint_c: f64,
    /// Monthly AC consumption at the baseline setpoint, kWh
    pub baseline_monthly_kwh: f64,
    /// Tariff in currency units per kWh
    pub rate_per_kwh: f64,
    /// Flat incentive paid when the policy opts in
    pub incentive_amount: f64,
    /// Grid emission factor, kg CO2e per kWh
    pub emission_factor_kg_per_kwh: f64,
    /// Setpoints above this start to cost comfort, °C
    pub comfort_setpoint_limit_c: f64,
    /// Comfort lost per °C above the setpoint limit
    pub heat_penalty_per_degree: f64,
    /// Outdoor temperature above which heat stress is amplified, °C
    pub scorching_outdoor_c: f64,
    /// Multiplier on the heat penalty on scorching days
    pub scorching_heat_factor: f64,
    /// Reductions above this start to cost comfort, percentage points
    pub reduction_comfort_limit_pct: f64,
    /// Comfort lost per percentage point above the reduction limit
    pub reduction_penalty_per_pct: f64,
    pub min_comfort: f64,
    pub max_comfort: f64,
}

impl Default for PolicyModel {
    fn default() -> Self {
        Self {
            baseline_setpoint_c: 22.0,
            baseline_monthly_kwh: 25_500.0,
            rate_per_kwh: 12.0,
            incentive_amount: 5_000.0,
            emission_factor_kg_per_kwh: 0.82,
            comfort_setpoint_limit_c: 24.0,
            heat_penalty_per_degree: 0.1,
            scorching_outdoor_c: 40.0,
            scorching_heat_factor: 1.5,
            reduction_comfort_limit_pct: 15.0,
            reduction_penalty_per_pct: 0.015,
            min_comfort: 0.1,
            max_comfort: 1.0,
        }
    }
}

/// Stateless simulator evaluating [`SimulationParams`] against an outdoor
/// temperature.
#[derive(Debug, Clone, Default)]
pub struct PolicySimulator {
    model: PolicyModel,
}

impl PolicySimulator {
    pub fn new(model: PolicyModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &PolicyModel {
        &self.model
    }

    /// Fraction of baseline thermal load removed by moving the setpoint.
    ///
    /// Zero when it is no warmer outside than the baseline setpoint. Negative
    /// when the new setpoint is below the baseline (more cooling).
    pub fn thermal_savings_fraction(&self, ac_temp: f64, outdoor_temp: f64) -> f64 {
        let delta_baseline = (outdoor_temp - self.model.baseline_setpoint_c).max(0.0);
        let delta_new = (outdoor_temp - ac_temp).max(0.0);

        if delta_baseline > 0.0 {
            1.0 - delta_new / delta_baseline
        } else {
            0.0
        }
    }

    /// Comfort proxy before rounding, clamped to the model bounds.
    pub fn comfort_score(&self, params: &SimulationParams, outdoor_temp: f64) -> f64 {
        let m = &self.model;
        let mut score = m.max_comfort;

        if params.ac_temp > m.comfort_setpoint_limit_c {
            let heat_factor = if outdoor_temp > m.scorching_outdoor_c {
                m.scorching_heat_factor
            } else {
                1.0
            };
            score -= (params.ac_temp - m.comfort_setpoint_limit_c)
                * m.heat_penalty_per_degree
                * heat_factor;
        }

        if params.reduction_percent > m.reduction_comfort_limit_pct {
            score -= (params.reduction_percent - m.reduction_comfort_limit_pct)
                * m.reduction_penalty_per_pct;
        }

        score.max(m.min_comfort).min(m.max_comfort)
    }

    pub fn simulate(&self, params: &SimulationParams, outdoor_temp: f64) -> SimulationResult {
        let m = &self.model;

        let total_savings = self.thermal_savings_fraction(params.ac_temp, outdoor_temp)
            + params.reduction_percent / 100.0;
        let energy_saved_kwh = m.baseline_monthly_kwh * total_savings;

        let incentive = if params.incentive_enabled {
            m.incentive_amount
        } else {
            0.0
        };
        let cost_savings = energy_saved_kwh * m.rate_per_kwh + incentive;
        let carbon_reduction = energy_saved_kwh * m.emission_factor_kg_per_kwh;

        SimulationResult {
            cost_savings: round_to(cost_savings, 2),
            carbon_reduction: round_to(carbon_reduction, 2),
            comfort_score: round_to(self.comfort_score(params, outdoor_temp), 2),
            energy_saved: round_to(energy_saved_kwh, 2),
            outdoor_temp: round_to(outdoor_temp, 1),
        }
    }
}

/// Correctly rounded to `decimals` places, exact ties going to the even
/// digit. Float formatting works on the exact binary value, so 0.985
/// (stored just below the tie) becomes 0.98 and 0.625 becomes 0.62.
fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn params(ac_temp: f64, reduction_percent: f64, incentive_enabled: bool) -> SimulationParams {
        SimulationParams {
            ac_temp,
            reduction_percent,
            incentive_enabled,
        }
    }

    #[test]
    fn test_moderate_policy_on_hot_day() {
        let sim = PolicySimulator::default();
        let result = sim.simulate(&params(24.0, 10.0, false), 35.0);

        // 25500 * (2/13 + 0.10)
        assert_eq!(result.energy_saved, 6473.08);
        assert_eq!(result.cost_savings, 77676.92);
        assert_eq!(result.carbon_reduction, 5307.92);
        assert_eq!(result.comfort_score, 1.0);
        assert_eq!(result.outdoor_temp, 35.0);
    }

    #[test]
    fn test_thermal_fraction_on_hot_day() {
        let sim = PolicySimulator::default();
        let fraction = sim.thermal_savings_fraction(24.0, 35.0);
        assert!((fraction - 2.0 / 13.0).abs() < 1e-12);
    }

    #[rstest]
    #[case(16.0)]
    #[case(22.0)]
    #[case(26.0)]
    #[case(-5.0)]
    fn test_cool_day_saves_nothing(#[case] ac_temp: f64) {
        let sim = PolicySimulator::default();
        assert_eq!(sim.thermal_savings_fraction(ac_temp, 20.0), 0.0);

        let result = sim.simulate(&params(ac_temp, 0.0, false), 20.0);
        assert_eq!(result.energy_saved, 0.0);
        assert_eq!(result.cost_savings, 0.0);
        assert_eq!(result.carbon_reduction, 0.0);
    }

    #[test]
    fn test_outdoor_exactly_at_baseline_saves_nothing() {
        let sim = PolicySimulator::default();
        assert_eq!(sim.thermal_savings_fraction(30.0, 22.0), 0.0);
    }

    #[test]
    fn test_scorching_day_clamps_comfort() {
        let sim = PolicySimulator::default();
        let result = sim.simulate(&params(30.0, 0.0, false), 45.0);
        assert_eq!(result.comfort_score, 0.1);
    }

    #[test]
    fn test_heat_penalty_without_scorching() {
        let sim = PolicySimulator::default();
        // 1.0 - (27 - 24) * 0.1
        let result = sim.simulate(&params(27.0, 0.0, false), 35.0);
        assert_eq!(result.comfort_score, 0.7);
    }

    #[test]
    fn test_reduction_penalty() {
        let sim = PolicySimulator::default();
        // 1.0 - (35 - 15) * 0.015
        let result = sim.simulate(&params(24.0, 35.0, false), 30.0);
        assert_eq!(result.comfort_score, 0.7);
    }

    #[test]
    fn test_colder_setpoint_increases_load() {
        let sim = PolicySimulator::default();
        let result = sim.simulate(&params(18.0, 0.0, false), 35.0);
        assert!(result.energy_saved < 0.0);
        assert!(result.carbon_reduction < 0.0);
    }

    #[test]
    fn test_out_of_range_inputs_pass_through() {
        let sim = PolicySimulator::default();
        let result = sim.simulate(&params(-10.0, -50.0, false), 35.0);
        assert_eq!(result.comfort_score, 1.0);
        assert!(result.energy_saved < 0.0);
    }

    #[rstest]
    #[case(16.0, 0.98)]
    #[case(28.0, 0.8)]
    #[case(40.0, 0.62)]
    #[case(74.0, 0.11)]
    fn test_comfort_rounding_near_ties(#[case] reduction: f64, #[case] expected: f64) {
        let sim = PolicySimulator::default();
        let result = sim.simulate(&params(24.0, reduction, false), 35.0);
        assert_eq!(result.comfort_score, expected);
    }

    #[rstest]
    #[case(30.25, 30.2)]
    #[case(30.75, 30.8)]
    fn test_outdoor_temp_ties_to_even(#[case] outdoor: f64, #[case] expected: f64) {
        let sim = PolicySimulator::default();
        let result = sim.simulate(&params(24.0, 0.0, false), outdoor);
        assert_eq!(result.outdoor_temp, expected);
    }

    #[test]
    fn test_round_to_passes_non_finite_through() {
        assert_eq!(round_to(f64::INFINITY, 2), f64::INFINITY);
        assert!(round_to(f64::NAN, 2).is_nan());
    }

    #[test]
    fn test_outdoor_temp_rounded_to_one_decimal() {
        let sim = PolicySimulator::default();
        let result = sim.simulate(&params(24.0, 0.0, false), 31.26);
        assert_eq!(result.outdoor_temp, 31.3);
    }

    #[test]
    fn test_custom_model_coefficients() {
        let sim = PolicySimulator::new(PolicyModel {
            rate_per_kwh: 8.0,
            incentive_amount: 0.0,
            ..PolicyModel::default()
        });
        assert_eq!(sim.model().baseline_setpoint_c, 22.0);

        // outdoor 32: baseline delta 10, new delta 7 -> 30% of 25500 kWh
        let result = sim.simulate(&params(25.0, 0.0, true), 32.0);
        assert_eq!(result.energy_saved, 7650.0);
        assert_eq!(result.cost_savings, 61200.0);
    }

    #[test]
    fn test_non_finite_field_detection() {
        let sim = PolicySimulator::default();
        let ok = sim.simulate(&params(24.0, 10.0, true), 35.0);
        assert_eq!(ok.non_finite_field(), None);

        let overflow = sim.simulate(&params(24.0, f64::MAX, false), 35.0);
        assert_eq!(overflow.non_finite_field(), Some("costSavings"));
    }

    #[test]
    fn test_params_use_camel_case() {
        let p: SimulationParams = serde_json::from_str(
            r#"{"acTemp": 25, "reductionPercent": 12.5, "incentiveEnabled": true}"#,
        )
        .unwrap();
        assert_eq!(p, params(25.0, 12.5, true));
    }

    proptest! {
        #[test]
        fn prop_comfort_score_is_clamped(
            ac_temp in -100.0f64..150.0,
            reduction in -200.0f64..200.0,
            outdoor in -60.0f64..70.0,
            incentive in any::<bool>(),
        ) {
            let sim = PolicySimulator::default();
            let result = sim.simulate(&params(ac_temp, reduction, incentive), outdoor);
            prop_assert!(result.comfort_score >= 0.1);
            prop_assert!(result.comfort_score <= 1.0);
        }

        #[test]
        fn prop_simulation_is_deterministic(
            ac_temp in -100.0f64..150.0,
            reduction in -200.0f64..200.0,
            outdoor in -60.0f64..70.0,
            incentive in any::<bool>(),
        ) {
            let sim = PolicySimulator::default();
            let p = params(ac_temp, reduction, incentive);
            let a = sim.simulate(&p, outdoor);
            let b = sim.simulate(&p, outdoor);
            prop_assert_eq!(a.cost_savings.to_bits(), b.cost_savings.to_bits());
            prop_assert_eq!(a.carbon_reduction.to_bits(), b.carbon_reduction.to_bits());
            prop_assert_eq!(a.comfort_score.to_bits(), b.comfort_score.to_bits());
            prop_assert_eq!(a.energy_saved.to_bits(), b.energy_saved.to_bits());
            prop_assert_eq!(a.outdoor_temp.to_bits(), b.outdoor_temp.to_bits());
        }

        #[test]
        fn prop_incentive_adds_fixed_amount(
            ac_temp in 10.0f64..35.0,
            reduction in 0.0f64..100.0,
            outdoor in 25.0f64..50.0,
        ) {
            let sim = PolicySimulator::default();
            let with = sim.simulate(&params(ac_temp, reduction, true), outdoor);
            let without = sim.simulate(&params(ac_temp, reduction, false), outdoor);
            prop_assert!((with.cost_savings - without.cost_savings - 5000.0).abs() < 0.011);
            prop_assert_eq!(with.energy_saved, without.energy_saved);
            prop_assert_eq!(with.carbon_reduction, without.carbon_reduction);
            prop_assert_eq!(with.comfort_score, without.comfort_score);
        }

        #[test]
        fn prop_cool_outdoor_has_no_thermal_savings(
            ac_temp in -100.0f64..150.0,
            outdoor in -60.0f64..=22.0,
        ) {
            let sim = PolicySimulator::default();
            prop_assert_eq!(sim.thermal_savings_fraction(ac_temp, outdoor), 0.0);
        }
    }
}
