use crate::logic::error::{ReplicatorError, Result};
use super::types::{AttributeKind, Dataset, Header};

/// Capability check run before any training work starts.
///
/// Accepts numeric/date features, a nominal class with one or two declared
/// values, no missing values and at least `min_instances` rows.
pub fn validate_for_training(dataset: &Dataset, min_instances: usize) -> Result<()> {
    let header = &dataset.header;

    // Attributes
    if header.feature_count() == 0 {
        return Err(ReplicatorError::invalid_dataset("no feature attributes"));
    }
    for attribute in header.feature_attributes() {
        if !attribute.is_numeric_like() {
            return Err(ReplicatorError::invalid_dataset(format!(
                "cannot handle {} attribute '{}'",
                kind_name(&attribute.kind),
                attribute.name
            )));
        }
    }

    // Class
    let class = header.class_attribute();
    let num_classes = match &class.kind {
        AttributeKind::Nominal(values) => values.len(),
        other => {
            return Err(ReplicatorError::invalid_dataset(format!(
                "class attribute '{}' must be nominal, got {}",
                class.name,
                kind_name(other)
            )))
        }
    };
    if !(1..=2).contains(&num_classes) {
        return Err(ReplicatorError::invalid_dataset(format!(
            "class attribute '{}' must declare one or two values, got {}",
            class.name, num_classes
        )));
    }

    // Instances
    let width = header.feature_count();
    for (row, instance) in dataset.instances.iter().enumerate() {
        if instance.features.len() != width {
            return Err(ReplicatorError::invalid_dataset(format!(
                "row {} has {} features, expected {}",
                row,
                instance.features.len(),
                width
            )));
        }
        if instance.has_missing() {
            return Err(ReplicatorError::invalid_dataset(format!(
                "row {} has missing feature values",
                row
            )));
        }
        match instance.label {
            None => {
                return Err(ReplicatorError::invalid_dataset(format!(
                    "row {} has a missing class value",
                    row
                )))
            }
            Some(label) if label >= num_classes => {
                return Err(ReplicatorError::invalid_dataset(format!(
                    "row {} has class index {} but only {} values are declared",
                    row, label, num_classes
                )))
            }
            Some(_) => {}
        }
    }

    if dataset.len() < min_instances {
        return Err(ReplicatorError::invalid_dataset(format!(
            "not enough training instances (required: {}, provided: {})",
            min_instances,
            dataset.len()
        )));
    }

    Ok(())
}

/// Scoring requires the two-valued label convention
pub fn validate_for_scoring(header: &Header) -> Result<()> {
    let got = header.num_classes();
    if got != 2 {
        return Err(ReplicatorError::InvalidLabelCardinality { got });
    }
    Ok(())
}

fn kind_name(kind: &AttributeKind) -> &'static str {
    match kind {
        AttributeKind::Numeric => "numeric",
        AttributeKind::Date => "date",
        AttributeKind::Nominal(_) => "nominal",
        AttributeKind::Text => "string",
    }
}
