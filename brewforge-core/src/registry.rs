//! The catalog of brewing methods.
//!
//! A [`Registry`] is built once at startup, either from the catalog compiled
//! into the crate or from a directory of user-supplied YAML files, and is
//! read-only afterwards.

use crate::{error::BrewError, store::FavoriteSet};
use brewforge_schemas::{
    file_formats::MethodFile,
    method::{BrewingMethod, BrewingTechnique},
    recipe::CalculatorState,
};
use std::{fs, path::Path};
use tracing::{debug, info};

const BUILTIN_CATALOG: &str = include_str!("../data/brewing_methods.yaml");

/// One bar of the ratio comparison chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioRow {
    pub method_name: String,
    pub technique_name: String,
    pub ratio: f64,
}

#[derive(Debug, Clone)]
pub struct Registry {
    methods: Vec<BrewingMethod>,
}

impl Registry {
    /// Parses the catalog that ships with the crate.
    pub fn builtin() -> Result<Self, BrewError> {
        Self::from_yaml_str("<builtin>", BUILTIN_CATALOG)
    }

    pub fn from_yaml_str(source: &str, content: &str) -> Result<Self, BrewError> {
        let file: MethodFile = serde_yaml::from_str(content)
            .map_err(|e| BrewError::YamlParsing(source.to_string(), e))?;
        debug!(source, schema_version = %file.schema_version, methods = file.methods.len(), "parsed method file");
        Self::from_methods(file.methods)
    }

    pub fn from_methods(methods: Vec<BrewingMethod>) -> Result<Self, BrewError> {
        if methods.is_empty() {
            return Err(BrewError::EmptyCatalog);
        }
        let registry = Self { methods };
        registry.validate()?;
        Ok(registry)
    }

    /// Loads every `*.yaml`/`*.yml` file in `dir_path`, in file-name order.
    ///
    /// A method whose id was already seen replaces the earlier definition in place.
    pub fn load_dir<P: AsRef<Path>>(dir_path: P) -> Result<Self, BrewError> {
        let dir = dir_path.as_ref();
        info!("Loading brewing catalog from {:?}", dir);

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| BrewError::FileIO(dir.display().to_string(), e))? {
            let path = entry
                .map_err(|e| BrewError::FileIO(dir.display().to_string(), e))?
                .path();
            if path.is_file() && path.extension().map_or(false, |s| s == "yaml" || s == "yml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut methods: Vec<BrewingMethod> = Vec::new();
        for path in paths {
            let name = path.display().to_string();
            let content = fs::read_to_string(&path).map_err(|e| BrewError::FileIO(name.clone(), e))?;
            let file: MethodFile =
                serde_yaml::from_str(&content).map_err(|e| BrewError::YamlParsing(name.clone(), e))?;
            for method in file.methods {
                match methods.iter_mut().find(|m| m.id == method.id) {
                    Some(existing) => *existing = method,
                    None => methods.push(method),
                }
            }
        }

        Self::from_methods(methods)
    }

    pub fn methods(&self) -> &[BrewingMethod] {
        &self.methods
    }

    pub fn method(&self, id: &str) -> Option<&BrewingMethod> {
        self.methods.iter().find(|m| m.id == id)
    }

    pub fn technique(&self, method_id: &str, index: usize) -> Option<&BrewingTechnique> {
        self.method(method_id).and_then(|m| m.techniques.get(index))
    }

    /// Like [`Registry::technique`], but reports which part of the lookup failed.
    pub fn require_technique(&self, method_id: &str, index: usize) -> Result<&BrewingTechnique, BrewError> {
        let method = self
            .method(method_id)
            .ok_or_else(|| BrewError::MethodNotFound(method_id.to_string()))?;
        method.techniques.get(index).ok_or_else(|| BrewError::TechniqueNotFound {
            method_id: method_id.to_string(),
            index,
        })
    }

    pub fn default_method(&self) -> &BrewingMethod {
        // Construction rejects empty catalogs.
        &self.methods[0]
    }

    pub fn default_state(&self) -> CalculatorState {
        let method = self.default_method();
        let technique = &method.techniques[0];
        CalculatorState {
            method_id: method.id.clone(),
            technique_index: 0,
            coffee_amount: technique.default_coffee_amount,
            ratio: technique.ratio,
        }
    }

    /// Favorite methods first, then the rest. Both groups keep catalog order.
    pub fn sorted_by_favorites(&self, favorites: &FavoriteSet) -> Vec<&BrewingMethod> {
        let (mut favorite, other): (Vec<&BrewingMethod>, Vec<&BrewingMethod>) =
            self.methods.iter().partition(|m| favorites.contains(&m.id));
        favorite.extend(other);
        favorite
    }

    pub fn ratio_table(&self) -> Vec<RatioRow> {
        self.methods
            .iter()
            .flat_map(|method| {
                method.techniques.iter().map(move |t| RatioRow {
                    method_name: method.name.clone(),
                    technique_name: t.name.clone(),
                    ratio: t.ratio,
                })
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), BrewError> {
        for method in &self.methods {
            if method.techniques.is_empty() {
                return Err(BrewError::InvalidTechnique {
                    technique: method.id.clone(),
                    reason: "method has no techniques".to_string(),
                });
            }
            for technique in &method.techniques {
                validate_technique(technique)?;
            }
        }
        Ok(())
    }
}

fn validate_technique(technique: &BrewingTechnique) -> Result<(), BrewError> {
    let invalid = |reason: String| BrewError::InvalidTechnique {
        technique: technique.name.clone(),
        reason,
    };

    if !(technique.ratio > 0.0) || !(technique.default_coffee_amount > 0.0) {
        return Err(invalid("ratio and default coffee amount must be positive".to_string()));
    }
    if technique.steps.is_empty() {
        return Err(invalid("technique has no steps".to_string()));
    }

    let mut last_time = 0;
    let mut last_water = 0.0;
    for step in &technique.steps {
        if step.time < last_time {
            return Err(invalid(format!("step at {}s comes after a step at {}s", step.time, last_time)));
        }
        last_time = step.time;
        if let Some(water) = step.water_amount {
            if water < last_water {
                return Err(invalid(format!("cumulative water drops from {}g to {}g", last_water, water)));
            }
            last_water = water;
        }
    }
    if last_time > technique.total_time {
        return Err(invalid(format!(
            "last step at {}s exceeds total time {}s",
            last_time, technique.total_time
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_loads_and_validates() {
        let registry = Registry::builtin().unwrap();
        assert_eq!(registry.methods().len(), 10);
        assert_eq!(registry.default_method().id, "v60");
        assert_eq!(registry.method("v60").unwrap().techniques.len(), 2);
    }

    #[test]
    fn default_state_uses_first_technique() {
        let registry = Registry::builtin().unwrap();
        let state = registry.default_state();
        assert_eq!(state.method_id, "v60");
        assert_eq!(state.technique_index, 0);
        assert_eq!(state.coffee_amount, 18.0);
        assert_eq!(state.ratio, 16.67);
    }

    #[test]
    fn favorites_come_first_in_catalog_order() {
        let registry = Registry::builtin().unwrap();
        let favorites: FavoriteSet = ["siphon", "chemex"].iter().map(|s| s.to_string()).collect();
        let ids: Vec<&str> = registry
            .sorted_by_favorites(&favorites)
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(&ids[..3], &["chemex", "siphon", "v60"]);
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn require_technique_distinguishes_failures() {
        let registry = Registry::builtin().unwrap();
        assert!(matches!(
            registry.require_technique("percolator", 0),
            Err(BrewError::MethodNotFound(_))
        ));
        assert!(matches!(
            registry.require_technique("chemex", 1),
            Err(BrewError::TechniqueNotFound { index: 1, .. })
        ));
    }

    #[test]
    fn rejects_decreasing_step_times() {
        let yaml = r#"
schema_version: "1.0"
methods:
  - id: broken
    name: Broken
    description: Out of order
    techniques:
      - name: Backwards
        ratio: 15
        default_coffee_amount: 20
        grind_size: Medium
        water_temp: 94
        total_time: 60
        description: Steps go back in time
        steps:
          - { time: 30, description: Second }
          - { time: 10, description: First }
"#;
        let err = Registry::from_yaml_str("broken.yaml", yaml).unwrap_err();
        assert!(matches!(err, BrewError::InvalidTechnique { .. }));
    }

    #[test]
    fn ratio_table_covers_every_technique() {
        let registry = Registry::builtin().unwrap();
        let table = registry.ratio_table();
        assert_eq!(table.len(), 11);
        assert!(table.iter().any(|r| r.technique_name == "Standard Espresso" && r.ratio == 2.0));
    }
}
