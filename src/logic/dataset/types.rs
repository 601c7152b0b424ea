use serde::{Deserialize, Serialize};

use crate::logic::error::{ReplicatorError, Result};

// ============================================================================
// ATTRIBUTES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeKind {
    Numeric,
    /// Timestamps stored as epoch milliseconds
    Date,
    /// Declared label values, in order
    Nominal(Vec<String>),
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

impl Attribute {
    pub fn numeric(name: &str) -> Self {
        Self { name: name.to_string(), kind: AttributeKind::Numeric }
    }

    pub fn date(name: &str) -> Self {
        Self { name: name.to_string(), kind: AttributeKind::Date }
    }

    pub fn nominal<S: AsRef<str>>(name: &str, values: &[S]) -> Self {
        Self {
            name: name.to_string(),
            kind: AttributeKind::Nominal(values.iter().map(|v| v.as_ref().to_string()).collect()),
        }
    }

    pub fn text(name: &str) -> Self {
        Self { name: name.to_string(), kind: AttributeKind::Text }
    }

    /// Numeric and date attributes can feed the network
    pub fn is_numeric_like(&self) -> bool {
        matches!(self.kind, AttributeKind::Numeric | AttributeKind::Date)
    }

    /// Number of declared values (0 for non-nominal attributes)
    pub fn num_values(&self) -> usize {
        match &self.kind {
            AttributeKind::Nominal(values) => values.len(),
            _ => 0,
        }
    }
}

// ============================================================================
// HEADER
// ============================================================================

/// Attribute schema shared by a dataset and the instances scored against it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub attributes: Vec<Attribute>,
    pub class_index: usize,
}

impl Header {
    pub fn new(attributes: Vec<Attribute>, class_index: usize) -> Result<Self> {
        if class_index >= attributes.len() {
            return Err(ReplicatorError::invalid_dataset(format!(
                "class index {} out of range for {} attributes",
                class_index,
                attributes.len()
            )));
        }
        Ok(Self { attributes, class_index })
    }

    /// Header with `feature_count` numeric features and a trailing nominal class
    pub fn numeric<S: AsRef<str>>(feature_count: usize, class_values: &[S]) -> Self {
        let mut attributes: Vec<Attribute> = (0..feature_count)
            .map(|i| Attribute::numeric(&format!("x{}", i)))
            .collect();
        attributes.push(Attribute::nominal("class", class_values));
        Self { attributes, class_index: feature_count }
    }

    /// Feature count: every attribute except the class
    pub fn feature_count(&self) -> usize {
        self.attributes.len() - 1
    }

    pub fn class_attribute(&self) -> &Attribute {
        &self.attributes[self.class_index]
    }

    /// Declared class values (0 when the class is not nominal)
    pub fn num_classes(&self) -> usize {
        self.class_attribute().num_values()
    }

    /// Non-class attributes in feature order
    pub fn feature_attributes(&self) -> impl Iterator<Item = &Attribute> {
        let class_index = self.class_index;
        self.attributes
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != class_index)
            .map(|(_, a)| a)
    }
}

// ============================================================================
// INSTANCES
// ============================================================================

/// One row: feature values (class column excluded) plus the label index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    /// Missing values are NaN
    pub features: Vec<f64>,
    pub label: Option<usize>,
}

impl Instance {
    pub fn new(features: Vec<f64>, label: Option<usize>) -> Self {
        Self { features, label }
    }

    pub fn unlabeled(features: Vec<f64>) -> Self {
        Self { features, label: None }
    }

    pub fn has_missing(&self) -> bool {
        self.features.iter().any(|v| !v.is_finite())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    pub header: Header,
    pub instances: Vec<Instance>,
}

impl Dataset {
    pub fn new(header: Header) -> Self {
        Self { header, instances: Vec::new() }
    }

    pub fn with_instances(header: Header, instances: Vec<Instance>) -> Self {
        Self { header, instances }
    }

    pub fn push(&mut self, instance: Instance) {
        self.instances.push(instance);
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.header.feature_count()
    }

    /// Feature rows in dataset order
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.instances.iter().map(|i| i.features.as_slice())
    }
}
