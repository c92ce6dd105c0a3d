use crate::cleaner::TextCleaner;
use crate::error::{CleanError, SessionError};
use crate::extractor::{extract_document, PdfExtractor};
use crate::invoker::ModelInvoker;
use crate::models::{LoadedDocument, PromptKind};
use crate::prompts::build_prompt;
use crate::traits::TextGenerator;
use chrono::Utc;
use std::path::Path;
use tracing::info;

/// Holds the most recently loaded document and the pieces that act on it.
pub struct Session<E, G>
where
    E: PdfExtractor,
    G: TextGenerator,
{
    extractor: E,
    cleaner: TextCleaner,
    invoker: ModelInvoker<G>,
    document: Option<LoadedDocument>,
}

impl<E, G> Session<E, G>
where
    E: PdfExtractor,
    G: TextGenerator + Send + Sync,
{
    pub fn new(extractor: E, generator: G) -> Result<Self, CleanError> {
        Ok(Self {
            extractor,
            cleaner: TextCleaner::new()?,
            invoker: ModelInvoker::new(generator),
            document: None,
        })
    }

    pub fn document(&self) -> Option<&LoadedDocument> {
        self.document.as_ref()
    }

    pub fn invoker(&self) -> &ModelInvoker<G> {
        &self.invoker
    }

    pub fn clear(&mut self) {
        self.document = None;
    }

    /// Extracts and cleans `path`, replacing the current document on success.
    ///
    /// A failed load leaves the previous document in place.
    pub fn process_document(&mut self, path: &Path) -> Result<&LoadedDocument, SessionError> {
        let raw = extract_document(&self.extractor, path)?;
        let cleaned_text = self.cleaner.clean(&raw.text);

        info!(
            path = %path.display(),
            pages = raw.page_count,
            chars = cleaned_text.len(),
            "document loaded"
        );

        let document: &LoadedDocument = self.document.insert(LoadedDocument {
            source_path: path.to_string_lossy().to_string(),
            page_count: raw.page_count,
            checksum: raw.checksum,
            cleaned_text,
            loaded_at: Utc::now(),
        });
        Ok(document)
    }

    /// The cleaned text of the loaded document, or `NoDocument` when there is none
    /// or it cleaned down to nothing.
    pub fn cleaned_text(&self) -> Result<&str, SessionError> {
        self.document
            .as_ref()
            .map(|document| document.cleaned_text.as_str())
            .filter(|text| !text.is_empty())
            .ok_or(SessionError::NoDocument)
    }

    pub async fn summarize(&self) -> Result<String, SessionError> {
        let prompt = self.prompt(PromptKind::Summary, None)?;
        Ok(self.invoker.generate(&prompt).await?)
    }

    pub async fn answer_question(&self, question: &str) -> Result<String, SessionError> {
        let prompt = self.prompt(PromptKind::Question, Some(question))?;
        Ok(self.invoker.generate(&prompt).await?)
    }

    /// Like `summarize`, with every failure rendered as display text.
    pub async fn summary_text(&self) -> String {
        match self.prompt(PromptKind::Summary, None) {
            Ok(prompt) => self.invoker.invoke(&prompt).await,
            Err(error) => error.to_string(),
        }
    }

    /// Like `answer_question`, with every failure rendered as display text.
    pub async fn answer_text(&self, question: &str) -> String {
        match self.prompt(PromptKind::Question, Some(question)) {
            Ok(prompt) => self.invoker.invoke(&prompt).await,
            Err(error) => error.to_string(),
        }
    }

    fn prompt(&self, kind: PromptKind, question: Option<&str>) -> Result<String, SessionError> {
        let text = self.cleaned_text()?;
        info!(?kind, chars = text.len(), "asking model");
        Ok(build_prompt(kind, text, question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractError, ModelError};
    use crate::extractor::PageText;
    use crate::prompts::SUMMARY_INSTRUCTION;
    use async_trait::async_trait;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    struct FakeExtractor {
        pages: Vec<PageText>,
    }

    impl PdfExtractor for FakeExtractor {
        fn extract_pages(&self, _pdf: &[u8]) -> Result<Vec<PageText>, ExtractError> {
            Ok(self.pages.clone())
        }
    }

    struct FailingExtractor;

    impl PdfExtractor for FailingExtractor {
        fn extract_pages(&self, _pdf: &[u8]) -> Result<Vec<PageText>, ExtractError> {
            Err(ExtractError::PdfParse("invalid file header".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingGenerator {
        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().map(|guard| guard.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(prompt.to_string());
            }
            Ok("model output".to_string())
        }
    }

    struct BrokenGenerator;

    #[async_trait]
    impl TextGenerator for BrokenGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
            Err(ModelError::Failed {
                stderr: "model not found".to_string(),
            })
        }
    }

    fn two_page_extractor() -> FakeExtractor {
        FakeExtractor {
            pages: vec![
                PageText {
                    number: 1,
                    text: "Page 1\nFoo".to_string(),
                },
                PageText {
                    number: 2,
                    text: "Page 2\nBar".to_string(),
                },
            ],
        }
    }

    fn scratch_pdf(dir: &Path) -> std::io::Result<std::path::PathBuf> {
        let path = dir.join("doc.pdf");
        fs::write(&path, b"%PDF-1.4\n%stub")?;
        Ok(path)
    }

    #[tokio::test]
    async fn handlers_require_a_loaded_document() -> Result<(), Box<dyn std::error::Error>> {
        let session = Session::new(two_page_extractor(), RecordingGenerator::default())?;

        for question in ["", "What is this about?", "Page 1"] {
            assert_eq!(
                session.answer_text(question).await,
                "Please upload and extract text first."
            );
        }
        assert!(matches!(session.summarize().await, Err(SessionError::NoDocument)));
        assert_eq!(session.summary_text().await, "Please upload and extract text first.");
        assert!(matches!(session.cleaned_text(), Err(SessionError::NoDocument)));
        assert!(session.invoker().generator().prompts().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn process_then_summarize_embeds_cleaned_text() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = scratch_pdf(dir.path())?;
        let mut session = Session::new(two_page_extractor(), RecordingGenerator::default())?;

        let expected = TextCleaner::new()?.clean("Page 1\nFoo\nPage 2\nBar\n");
        let document = session.process_document(&path)?;
        assert_eq!(document.cleaned_text, expected);
        assert_eq!(document.cleaned_text, "Foo Bar");
        assert_eq!(document.page_count, 2);

        assert_eq!(session.summarize().await?, "model output");

        let prompts = session.invoker().generator().prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].starts_with(SUMMARY_INSTRUCTION));
        assert_eq!(&prompts[0][SUMMARY_INSTRUCTION.len()..], expected);
        Ok(())
    }

    #[tokio::test]
    async fn answer_question_uses_context_template() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = scratch_pdf(dir.path())?;
        let mut session = Session::new(two_page_extractor(), RecordingGenerator::default())?;
        session.process_document(&path)?;

        session.answer_question("What comes after Foo?").await?;

        assert_eq!(
            session.invoker().generator().prompts(),
            vec!["Context: Foo Bar\n\nQuestion: What comes after Foo?\nAnswer:".to_string()]
        );
        Ok(())
    }

    #[tokio::test]
    async fn failed_extraction_is_rendered_and_keeps_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = scratch_pdf(dir.path())?;
        let mut session = Session::new(FailingExtractor, RecordingGenerator::default())?;

        let error = session.process_document(&path).expect_err("extraction fails");
        assert_eq!(
            error.to_string(),
            "Error processing PDF: Error extracting text from PDF: invalid file header"
        );
        assert!(session.document().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_document() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = scratch_pdf(dir.path())?;
        let mut session = Session::new(two_page_extractor(), RecordingGenerator::default())?;
        session.process_document(&path)?;

        let missing = dir.path().join("missing.pdf");
        let error = session.process_document(&missing).expect_err("missing file");
        assert!(matches!(error, SessionError::Extraction(ExtractError::Io(_))));
        assert_eq!(
            session.document().map(|document| document.cleaned_text.as_str()),
            Some("Foo Bar")
        );

        session.clear();
        assert!(session.document().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn document_that_cleans_to_nothing_counts_as_not_loaded() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = scratch_pdf(dir.path())?;
        let extractor = FakeExtractor {
            pages: vec![PageText {
                number: 1,
                text: "Page 1\n\u{000C}".to_string(),
            }],
        };
        let mut session = Session::new(extractor, RecordingGenerator::default())?;

        assert_eq!(session.process_document(&path)?.cleaned_text, "");
        assert!(matches!(session.cleaned_text(), Err(SessionError::NoDocument)));
        assert_eq!(session.summary_text().await, "Please upload and extract text first.");
        assert!(session.invoker().generator().prompts().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn model_failures_surface_as_display_text() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = scratch_pdf(dir.path())?;
        let mut session = Session::new(two_page_extractor(), BrokenGenerator)?;
        session.process_document(&path)?;

        assert_eq!(session.summary_text().await, "Error: model not found");
        assert_eq!(session.answer_text("why?").await, "Error: model not found");
        assert!(matches!(
            session.answer_question("why?").await,
            Err(SessionError::Model(ModelError::Failed { .. }))
        ));
        Ok(())
    }
}
