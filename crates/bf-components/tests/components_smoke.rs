//! Integration tests for bf-components with the ideal-gas CO2 model.

use bf_components::{
    ComponentError, ModelFunction, PipeModel, PipeSeg, PressureLimits, PressureStage,
    RealReservoir, TemperatureInversion,
};
use bf_core::units::{bara, celsius, k, kgps, m, pa, to_celsius};
use bf_fluids::{FluidState, IdealGasCo2, PropertyModel};
use proptest::prelude::*;

fn inbound(p_bara: f64, t_k: f64, w: f64) -> FluidState {
    FluidState::from_model(&IdealGasCo2::new(), bara(p_bara), k(t_k), kgps(w)).unwrap()
}

#[test]
fn compressor_35_to_60_bar() {
    let model = IdealGasCo2::new();
    let stage = PressureStage::compressor(bara(60.0));
    let out = stage
        .outlet(&model, &inbound(35.0, 300.0, 100.0), &TemperatureInversion::default())
        .unwrap();

    assert!((out.outlet.temperature().value - 354.83).abs() < 0.011);
    assert!((out.ideal_work - 32_469.48).abs() < 1.0);
    assert!((out.actual_work - 46_384.97).abs() < 1.5);
    assert_eq!(out.outlet.pressure(), bara(60.0));
    assert_eq!(out.outlet.flowrate(), kgps(100.0));
}

#[test]
fn compressor_outlet_ceiling() {
    let model = IdealGasCo2::new();
    let stage = PressureStage::compressor(bara(140.0));
    let err = stage
        .outlet(&model, &inbound(35.0, 300.0, 100.0), &TemperatureInversion::default())
        .unwrap_err();

    match err {
        ComponentError::TemperatureCeiling {
            temperature_c,
            limit_c,
        } => {
            assert_eq!(limit_c, 120.0);
            assert!((temperature_c - 182.41).abs() < 0.05);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn pressure_changer_is_isenthalpic() {
    let model = IdealGasCo2::new();
    let stage = PressureStage::changer(bara(20.0));
    let fluid = inbound(45.0, 300.0, 10.0);
    let out = stage
        .outlet(&model, &fluid, &TemperatureInversion::default())
        .unwrap();

    assert_eq!(out.actual_work, 0.0);
    assert!((out.outlet.enthalpy() - fluid.enthalpy()).abs() < 846.0 * 0.01);
    assert!((to_celsius(out.outlet.temperature()) - 26.85).abs() <= 0.01);
}

#[test]
fn stage_validation() {
    assert!(PressureStage::compressor(bara(60.0)).validate().is_ok());
    assert!(PressureStage::changer(pa(-1.0)).validate().is_err());

    let mut stage = PressureStage::compressor(bara(60.0));
    stage.model = bf_components::StageModel::Isentropic { efficiency: 1.5 };
    assert!(stage.validate().is_err());
}

#[test]
fn well_then_perforation_chain() {
    let limits = PressureLimits::default();
    let well = ModelFunction::well(RealReservoir::Hamilton);
    let perforation = ModelFunction::perforation(RealReservoir::Hamilton);

    let bottom = well.end_pressure(kgps(120.0), bara(60.0), &limits);
    let sandface = perforation.end_pressure(kgps(120.0), bottom, &limits);
    assert!(bottom.value > 0.0 && sandface.value > 0.0);
    assert!(sandface < bottom);
}

#[test]
fn pipe_end_pressure_uses_model_density() {
    let model = IdealGasCo2::new();
    let pipe = PipeSeg::new(m(1000.0), vec![m(0.6)]).unwrap();
    let fluid =
        FluidState::from_model(&model, pa(3.0e6), celsius(20.0), kgps(100.0)).unwrap();
    let end = pipe.end_pressure(&fluid, m(0.0), PipeModel::Complete, &PressureLimits::default());

    assert!(end.value < 3.0e6);
    assert!(end.value > 2.5e6);
    assert_eq!(fluid.density(), model.density(pa(3.0e6), celsius(20.0)).unwrap());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pipe_end_pressure_non_increasing_in_flowrate(
        p_bara in 5.0_f64..130.0,
        w_low in 0.5_f64..200.0,
        dw in 0.0_f64..100.0,
        length in 10.0_f64..20_000.0,
        d in 0.1_f64..1.2,
    ) {
        let model = IdealGasCo2::new();
        let pipe = PipeSeg::new(m(length), vec![m(d)]).unwrap();
        let limits = PressureLimits::default();
        let at = |w: f64| {
            let fluid = FluidState::from_model(&model, bara(p_bara), k(300.0), kgps(w)).unwrap();
            pipe.end_pressure(&fluid, m(0.0), PipeModel::Complete, &limits).value
        };
        prop_assert!(at(w_low + dw) <= at(w_low) + 1e-6);
    }
}
