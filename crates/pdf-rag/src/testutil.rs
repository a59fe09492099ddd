//! Shared test fixtures: synthetic PDFs and deterministic mock providers

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::{EmbeddingProvider, GeneratorProvider};

/// Build a small valid PDF with one text run per page
pub(crate) fn sample_pdf(pages: &[&str]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let kids: Vec<Object> = pages
        .iter()
        .map(|text| {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![50.into(), 750.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content stream"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            page_id.into()
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("serialize PDF");
    buffer
}

/// A structurally valid PDF whose page tree is empty
pub(crate) fn empty_pdf() -> Vec<u8> {
    sample_pdf(&[])
}

/// Deterministic embedder mapping each text onto a topic axis.
///
/// Texts mentioning the same topic get identical vectors (cosine distance
/// 0); texts about different topics are orthogonal (distance 1). Texts
/// with no known topic share a fallback axis.
pub(crate) struct KeywordEmbedder;

const TOPIC_AXES: [&str; 7] = ["cat", "dog", "fish", "bird", "tree", "rock", "ship"];

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        let mut vector = vec![0.0f32; TOPIC_AXES.len() + 1];
        let axis = TOPIC_AXES
            .iter()
            .position(|topic| lower.contains(topic))
            .unwrap_or(TOPIC_AXES.len());
        vector[axis] = 1.0;
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        TOPIC_AXES.len() + 1
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "keyword"
    }
}

/// Generator returning a fixed output and recording the prompts it saw
pub(crate) struct CannedGenerator {
    output: String,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl CannedGenerator {
    pub(crate) fn new(output: &str) -> Self {
        Self {
            output: output.to_string(),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

#[async_trait]
impl GeneratorProvider for CannedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.output.clone())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "canned"
    }

    fn model(&self) -> &str {
        "canned"
    }
}

/// Generator that always fails, for error-path tests
pub(crate) struct FailingGenerator;

#[async_trait]
impl GeneratorProvider for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::generation("model backend unavailable"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing"
    }

    fn model(&self) -> &str {
        "failing"
    }
}
