use std::path::PathBuf;

use bf_core::units::bara;
use bf_fluids::IdealGasCo2;
use bf_graph::ElementKind;
use bf_project::{ProjectError, ValidationError, build_network, load_yaml};
use bf_solver::{PressureSolution, Simulator, SplitStrategy};

fn demo(name: &str) -> PathBuf {
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let root = crate_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root");
    root.join("demos").join("networks").join(name)
}

#[test]
fn demos_load_and_build() {
    let demos = [
        ("01_single_pipe.yaml", 3, 2),
        ("02_two_branches.yaml", 7, 4),
        ("03_offshore_wells.yaml", 19, 8),
    ];

    for (name, elements, key_points) in demos {
        let file = load_yaml(&demo(name)).unwrap_or_else(|e| panic!("Failed to load {name}: {e}"));
        let built = build_network(&file).unwrap_or_else(|e| panic!("Failed to build {name}: {e}"));
        assert_eq!(built.network.len(), elements, "{name}");
        assert_eq!(built.key_points.len(), key_points, "{name}");
        assert!(built.fluid.is_some(), "{name}");
    }
}

#[test]
fn offshore_demo_wires_wells_and_settings() {
    let file = load_yaml(&demo("03_offshore_wells.yaml")).unwrap();
    let built = build_network(&file).unwrap();
    let net = &built.network;

    let perforation = net.find("hamilton well perforation").unwrap();
    assert!(matches!(
        net.element(perforation).unwrap().kind,
        ElementKind::Perforation(_)
    ));
    let booster = net.find("Booster").unwrap();
    assert!(matches!(
        net.element(booster).unwrap().kind,
        ElementKind::Compressor(_)
    ));
    let manifold = net.find("Manifold").unwrap();
    assert_eq!(net.element(manifold).unwrap().destinations().len(), 2);

    assert_eq!(built.settings.inlet.max_iterations, 40);
    assert_eq!(built.settings.inlet.low_pa, 1.0e5);
}

#[test]
fn single_pipe_demo_solves() {
    let file = load_yaml(&demo("01_single_pipe.yaml")).unwrap();
    let mut built = build_network(&file).unwrap();
    let fluid = built.fluid.unwrap();

    let model = IdealGasCo2::new();
    let sim = Simulator::new(&model, built.settings.clone()).unwrap();
    let inlet = built.network.root().unwrap();
    sim.apply_inlet_properties(
        &mut built.network,
        inlet,
        fluid.pressure,
        fluid.temperature,
        fluid.flowrate,
        true,
    )
    .unwrap();

    let search = sim.search_inlet_pressure(&mut built.network).unwrap();
    assert_eq!(search.pressure_solution, PressureSolution::Ok);
}

#[test]
fn two_branch_demo_uses_its_settings() {
    let file = load_yaml(&demo("02_two_branches.yaml")).unwrap();
    let mut built = build_network(&file).unwrap();
    assert_eq!(built.settings.splitter.strategy, SplitStrategy::Accelerated);

    let fluid = built.fluid.unwrap();
    let model = IdealGasCo2::new();
    let sim = Simulator::new(&model, built.settings.clone()).unwrap();
    let inlet = built.network.root().unwrap();
    sim.apply_inlet_properties(
        &mut built.network,
        inlet,
        fluid.pressure,
        fluid.temperature,
        fluid.flowrate,
        true,
    )
    .unwrap();

    let search = sim.search_inlet_pressure(&mut built.network).unwrap();
    assert_eq!(search.pressure_solution, PressureSolution::Ok);

    let hub = built.network.find("hub").unwrap();
    let total: f64 = built
        .network
        .allocation(hub)
        .unwrap()
        .iter()
        .map(|w| w.value)
        .sum();
    assert!((total - 100.0).abs() < 1e-9);

    let field_b = built.network.find("Field B").unwrap();
    let arrived = built.network.last_fluid(field_b).unwrap().pressure();
    assert!(arrived >= bara(28.0 * 0.99));
}

#[test]
fn builder_ordering_errors_surface() {
    let yaml = r#"
version: 1
name: Bad order
instructions:
  - type: inlet
    name: Inlet
  - type: splitter
    name: Hub
"#;
    let file: bf_project::NetworkFile = serde_yaml::from_str(yaml).unwrap();
    assert!(matches!(build_network(&file), Err(ProjectError::Graph(_))));
}

#[test]
fn missing_demo_is_an_io_error() {
    assert!(matches!(
        load_yaml(&demo("does_not_exist.yaml")),
        Err(ProjectError::Io(_))
    ));
}

#[test]
fn invalid_file_is_rejected_on_load() {
    let path = std::env::temp_dir().join("bf_project_invalid.yaml");
    std::fs::write(
        &path,
        "version: 1\nname: Bad\ninstructions:\n  - type: reservoir\n    name: R\n    target_pa: 3.0e6\n",
    )
    .unwrap();
    assert!(matches!(
        load_yaml(&path),
        Err(ProjectError::Validation(ValidationError::Order { .. }))
    ));
}
