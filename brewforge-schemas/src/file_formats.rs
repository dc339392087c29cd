use crate::method::BrewingMethod;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct MethodFile {
    pub schema_version: String,
    pub methods: Vec<BrewingMethod>,
}
