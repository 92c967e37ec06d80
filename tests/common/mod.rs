//! Shared helpers for integration tests: fixture PDFs and scripted models.

#![allow(dead_code)]

use edgequake_pdfproof::{ModelFailure, ModelReply, TextModel};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Write a PDF with one line of text per entry in `texts` and return its path.
pub fn write_fixture_pdf(dir: &Path, name: &str, title: &str, texts: &[&str]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(texts.len());
    for text in texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
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
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => texts.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(title),
        "Producer" => Object::string_literal("edgequake-pdfproof tests"),
    });
    doc.trailer.set("Info", info_id);

    let path = dir.join(name);
    doc.save(&path).expect("save fixture PDF");
    path
}

/// Replies with a fixed script and records every prompt it receives.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<ModelReply, ModelFailure>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<ModelReply, ModelFailure>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Succeed with `text` on every call, token counts 10 in / 5 out.
    pub fn ok(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| {
                    Ok(ModelReply {
                        text: t.to_string(),
                        input_tokens: 10,
                        output_tokens: 5,
                    })
                })
                .collect(),
        )
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<ModelReply, ModelFailure> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(ModelFailure::Api("script exhausted".into())))
    }
}

/// Never answers within any reasonable deadline.
pub struct StalledModel;

impl TextModel for StalledModel {
    async fn generate(&self, _prompt: &str) -> Result<ModelReply, ModelFailure> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(ModelReply::new("too late"))
    }
}
