use std::path::PathBuf;

use bf_project::{
    GenkeyError, Instruction, ProjectError, build_network, load_genkey, load_yaml, save_yaml,
};

fn pipeline(name: &str) -> PathBuf {
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let root = crate_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root");
    root.join("demos").join("pipelines").join(name)
}

#[test]
fn trunkline_imports_as_inlet_and_pipes() {
    let file = load_genkey(&pipeline("trunkline.genkey")).unwrap();
    assert_eq!(file.name, "trunkline");
    assert!(file.settings.is_none());

    let summary: Vec<(&str, usize)> = file
        .instructions
        .iter()
        .map(|i| match i {
            Instruction::Inlet { name, .. } => (name.as_str(), 0),
            Instruction::PipeSeg { name, .. } => (name.as_str(), 1),
            Instruction::PipeSeries { name, count, .. } => (name.as_str(), *count),
            other => panic!("unexpected instruction {other:?}"),
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Terminal", 0),
            ("Landfall", 1),
            ("Shore approach", 4),
            ("Seabed", 11),
        ]
    );

    match &file.instructions[3] {
        Instruction::PipeSeries {
            diameters_m,
            elevation_m,
            lengths_m,
            ..
        } => {
            assert_eq!(diameters_m, &vec![0.762]);
            assert_eq!(*elevation_m, -68.0);
            assert_eq!(lengths_m.last(), Some(&0.256));
            assert!((lengths_m.iter().sum::<f64>() - 2000.256).abs() < 1e-9);
        }
        other => panic!("expected a pipe series, got {other:?}"),
    }
}

#[test]
fn imported_pipeline_builds_once_terminated() {
    let mut file = load_genkey(&pipeline("trunkline.genkey")).unwrap();
    file.instructions.push(Instruction::Reservoir {
        name: "Store".to_string(),
        elevation_m: -100.0,
        target_pa: 3.0e6,
    });

    let built = build_network(&file).unwrap();
    assert_eq!(built.network.len(), 18);
    assert_eq!(built.key_points.len(), 2);
    assert!(built.fluid.is_none());
}

#[test]
fn imported_pipeline_saves_as_yaml() {
    let file = load_genkey(&pipeline("trunkline.genkey")).unwrap();
    let path = std::env::temp_dir().join("bf_project_trunkline.yaml");
    save_yaml(&path, &file).unwrap();
    let reloaded = load_yaml(&path).unwrap();
    assert_eq!(reloaded, file);
    let _ = std::fs::remove_file(path);
}

#[test]
fn genkey_without_geometry_is_rejected() {
    let path = std::env::temp_dir().join("bf_project_no_geometry.genkey");
    std::fs::write(&path, "PIPE LABEL=\"P\", XEND=10 m, DIAMETER=0.5 m\n").unwrap();
    let result = load_genkey(&path);
    let _ = std::fs::remove_file(&path);
    assert!(matches!(
        result,
        Err(ProjectError::Genkey(GenkeyError::MissingLine { keyword: "GEOMETRY" }))
    ));
}
