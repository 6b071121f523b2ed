pub mod html;
pub mod schema;


use crate::results::Record;
use scraper::{ElementRef, Html};
use schema::{CompiledSchema, FieldKind};
use url::Url;

pub use schema::{FeatureBlockSpec, FieldSpec, RecordSchema};

/// Turns rendered HTML into records according to a compiled schema
#[derive(Debug, Clone)]
pub struct Extractor {
    schema: CompiledSchema,
    origin: Url,
}

impl Extractor {
    pub fn new(schema: CompiledSchema, origin: Url) -> Self {
        Self { schema, origin }
    }

    pub fn schema(&self) -> &CompiledSchema {
        &self.schema
    }

    /// Extracts one record per container element, in document order.
    ///
    /// Missing fields take the schema sentinel; no containers yields an empty vec.
    pub fn extract(&self, html: &str) -> Vec<Record> {
        let doc = Html::parse_document(html);

        let records = doc
            .select(&self.schema.container)
            .map(|container| self.extract_record(container))
            .collect::<Vec<_>>();

        ::log::debug!("Extractor found {} containers", records.len());
        records
    }

    fn extract_record(&self, container: ElementRef<'_>) -> Record {
        let features = self.read_features(container);

        let values = self
            .schema
            .fields
            .iter()
            .map(|field| {
                let value = match &field.kind {
                    FieldKind::Feature { label } => features
                        .iter()
                        .rev()
                        .find(|(l, _)| l == label)
                        .map(|(_, v)| v.clone()),
                    kind => html::first_match(container, &field.selectors)
                        .and_then(|el| self.read_value(el, kind)),
                };
                value.unwrap_or_else(|| self.schema.sentinel.clone())
            })
            .collect();

        Record::new(self.schema.columns.clone(), values)
    }

    fn read_value(&self, element: ElementRef<'_>, kind: &FieldKind) -> Option<String> {
        match kind {
            FieldKind::Text => Some(html::element_text(element)),
            FieldKind::Link { attr } => html::non_empty_attr(element, attr)
                .and_then(|href| html::resolve_link(&self.origin, href)),
            FieldKind::Image { primary, fallback } => html::non_empty_attr(element, primary)
                .or_else(|| html::non_empty_attr(element, fallback))
                .map(str::to_string),
            FieldKind::Feature { .. } => None,
        }
    }

    /// Collects (lower-cased label, value) pairs from the container's feature blocks
    fn read_features(&self, container: ElementRef<'_>) -> Vec<(String, String)> {
        let Some(features) = &self.schema.features else {
            return Vec::new();
        };

        container
            .select(&features.block)
            .filter_map(|block| {
                let label = block.select(&features.label).next()?;
                let value = block.select(&features.value).next()?;
                Some((
                    html::element_text(label).to_lowercase(),
                    html::element_text(value),
                ))
            })
            .collect()
    }
}
