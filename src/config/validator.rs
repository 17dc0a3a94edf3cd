//! Config validation: model shape, referential integrity and API consistency.

use crate::config::{EntityModel, FullConfig};
use crate::error::ConfigError;
use std::collections::HashSet;

/// A model needs at least one column and unique column names.
pub fn validate_model(model: &EntityModel) -> Result<(), ConfigError> {
    if model.columns.is_empty() {
        return Err(ConfigError::EmptyModel(model.name.clone()));
    }
    let mut seen = HashSet::new();
    for c in &model.columns {
        if !seen.insert(c.name.as_str()) {
            return Err(ConfigError::DuplicateColumn {
                model: model.name.clone(),
                column: c.name.clone(),
            });
        }
    }
    Ok(())
}

pub fn validate(config: &FullConfig) -> Result<(), ConfigError> {
    let mut model_names = HashSet::new();
    for m in &config.models {
        if !model_names.insert(m.name.as_str()) {
            return Err(ConfigError::Validation(format!("duplicate model: {}", m.name)));
        }
        validate_model(m)?;
    }

    let mut path_segments = HashSet::new();
    for api in &config.api_entities {
        if !model_names.contains(api.model.as_str()) {
            return Err(ConfigError::MissingReference {
                kind: "model",
                id: api.model.clone(),
            });
        }
        if !path_segments.insert(api.path_segment.as_str()) {
            return Err(ConfigError::DuplicatePathSegment(api.path_segment.clone()));
        }
    }

    Ok(())
}
