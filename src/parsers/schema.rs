use crate::error::ConfigError;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Declarative description of how one record is pulled out of a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Selector matching one container element per record
    pub container: String,

    /// Value written for any field whose element is absent
    #[serde(default)]
    pub sentinel: String,

    /// Output columns, in CSV order
    pub fields: Vec<FieldSpec>,

    /// Labelled feature blocks (e.g. area/beds/baths) inside a container
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureBlockSpec>,
}

/// One output column and where its value comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Column name written to the CSV header
    pub name: String,

    /// Sub-selectors tried in order; the first match wins.
    /// Empty means the container element itself.
    #[serde(default)]
    pub selectors: Vec<String>,

    #[serde(default)]
    pub kind: FieldKind,
}

/// How the value of a matched element is read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Whitespace-normalized text content
    #[default]
    Text,

    /// An attribute holding a possibly relative URL, resolved against the origin
    Link {
        #[serde(default = "default_link_attr")]
        attr: String,
    },

    /// Image URL from a primary attribute, falling back to a lazy-load attribute
    Image {
        #[serde(default = "default_image_attr")]
        primary: String,
        #[serde(default = "default_lazy_image_attr")]
        fallback: String,
    },

    /// Value of the feature block whose lower-cased label equals `label`
    Feature { label: String },
}

/// Selectors describing labelled feature blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureBlockSpec {
    /// Selector for each block, relative to the container
    pub block: String,
    /// Label element inside a block
    pub label: String,
    /// Value element inside a block
    pub value: String,
}

fn default_link_attr() -> String {
    "href".to_string()
}

fn default_image_attr() -> String {
    "src".to_string()
}

fn default_lazy_image_attr() -> String {
    "data-src".to_string()
}

impl FieldSpec {
    pub fn text(name: &str, selectors: &[&str]) -> Self {
        Self::with_kind(name, selectors, FieldKind::Text)
    }

    pub fn link(name: &str, selectors: &[&str]) -> Self {
        Self::with_kind(
            name,
            selectors,
            FieldKind::Link {
                attr: default_link_attr(),
            },
        )
    }

    pub fn image(name: &str, selectors: &[&str]) -> Self {
        Self::with_kind(
            name,
            selectors,
            FieldKind::Image {
                primary: default_image_attr(),
                fallback: default_lazy_image_attr(),
            },
        )
    }

    pub fn feature(name: &str, label: &str) -> Self {
        Self::with_kind(
            name,
            &[],
            FieldKind::Feature {
                label: label.to_lowercase(),
            },
        )
    }

    fn with_kind(name: &str, selectors: &[&str], kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            kind,
        }
    }
}

/// A schema with every selector parsed, ready for extraction
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    pub(crate) container: Selector,
    pub(crate) sentinel: String,
    pub(crate) columns: Arc<[String]>,
    pub(crate) fields: Vec<CompiledField>,
    pub(crate) features: Option<CompiledFeatures>,
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledField {
    pub(crate) selectors: Vec<Selector>,
    pub(crate) kind: FieldKind,
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledFeatures {
    pub(crate) block: Selector,
    pub(crate) label: Selector,
    pub(crate) value: Selector,
}

impl RecordSchema {
    /// Column names in output order
    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    /// Parse all selectors and validate the field set
    pub fn compile(&self) -> Result<CompiledSchema, ConfigError> {
        if self.fields.is_empty() {
            return Err(ConfigError::Invalid(
                "record schema must declare at least one field".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate field name `{}` in record schema",
                    field.name
                )));
            }
        }

        let has_feature_fields = self
            .fields
            .iter()
            .any(|f| matches!(f.kind, FieldKind::Feature { .. }));
        if has_feature_fields && self.features.is_none() {
            return Err(ConfigError::Invalid(
                "feature fields require a `features` block selector".to_string(),
            ));
        }

        let container = parse_selector("container", &self.container)?;

        let fields = self
            .fields
            .iter()
            .map(|field| {
                let selectors = field
                    .selectors
                    .iter()
                    .map(|s| parse_selector(&format!("field `{}`", field.name), s))
                    .collect::<Result<Vec<_>, _>>()?;
                let kind = match &field.kind {
                    FieldKind::Feature { label } => FieldKind::Feature {
                        label: label.trim().to_lowercase(),
                    },
                    other => other.clone(),
                };
                Ok(CompiledField { selectors, kind })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let features = match &self.features {
            Some(spec) => Some(CompiledFeatures {
                block: parse_selector("feature block", &spec.block)?,
                label: parse_selector("feature label", &spec.label)?,
                value: parse_selector("feature value", &spec.value)?,
            }),
            None => None,
        };

        Ok(CompiledSchema {
            container,
            sentinel: self.sentinel.clone(),
            columns: self.column_names().into(),
            fields,
            features,
        })
    }
}

impl CompiledSchema {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }
}

fn parse_selector(context: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::Selector {
        context: context.to_string(),
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}
