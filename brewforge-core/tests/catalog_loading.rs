use brewforge_core::{registry::Registry, BrewError};
use std::fs;
use tempfile::TempDir;

fn method_file(id: &str, name: &str, ratio: f64) -> String {
    format!(
        r#"schema_version: "1.0"
methods:
  - id: {id}
    name: "{name}"
    description: "Test method"
    techniques:
      - name: "House"
        ratio: {ratio}
        default_coffee_amount: 20
        grind_size: Medium
        water_temp: 94
        total_time: 120
        description: "Single pour"
        steps:
          - {{ time: 0, description: "Pour", water_amount: 300, is_pour: true }}
          - {{ time: 120, description: "Done" }}
"#
    )
}

#[test]
fn loads_yaml_files_in_name_order_with_later_ids_replacing_earlier_ones() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("01-base.yaml"), method_file("drip", "Drip", 15.0)).unwrap();
    fs::write(dir.path().join("02-extra.yml"), method_file("pourover", "Pour Over", 16.0)).unwrap();
    fs::write(dir.path().join("03-override.yaml"), method_file("drip", "Better Drip", 17.0)).unwrap();
    fs::write(dir.path().join("notes.txt"), "not a catalog").unwrap();

    let registry = Registry::load_dir(dir.path()).unwrap();
    let ids: Vec<&str> = registry.methods().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["drip", "pourover"]);

    let drip = registry.method("drip").unwrap();
    assert_eq!(drip.name, "Better Drip");
    assert_eq!(drip.techniques[0].ratio, 17.0);
    assert_eq!(registry.default_state().method_id, "drip");
}

#[test]
fn empty_directory_is_an_empty_catalog() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(Registry::load_dir(dir.path()), Err(BrewError::EmptyCatalog)));
}

#[test]
fn malformed_yaml_names_the_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.yaml"), "methods: [ {id: 1").unwrap();
    match Registry::load_dir(dir.path()) {
        Err(BrewError::YamlParsing(path, _)) => assert!(path.ends_with("bad.yaml")),
        other => panic!("expected a YAML error, got {:?}", other.map(|r| r.methods().len())),
    }
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nowhere");
    assert!(matches!(Registry::load_dir(&missing), Err(BrewError::FileIO(_, _))));
}

#[test]
fn every_builtin_technique_scales_to_its_own_defaults() {
    let registry = Registry::builtin().unwrap();
    assert_eq!(registry.ratio_table().len(), 11);
    for method in registry.methods() {
        for technique in &method.techniques {
            let timeline = brewforge_core::Timeline::derive(technique, technique.default_total_water()).unwrap();
            let last_pour = technique
                .steps
                .iter()
                .filter(|s| s.is_pour)
                .filter_map(|s| s.water_amount)
                .last()
                .unwrap_or(0.0);
            assert_eq!(timeline.points().last().unwrap().water, last_pour.round(), "{}", technique.name);
        }
    }
}
