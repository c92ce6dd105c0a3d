pub mod backends;
pub mod cleaner;
pub mod error;
pub mod extractor;
pub mod invoker;
pub mod models;
pub mod prompts;
pub mod session;
pub mod traits;

pub use backends::{BackendKind, CommandGenerator, GeneratorBackend, OllamaHttpGenerator};
pub use cleaner::{normalize_whitespace, TextCleaner};
pub use error::{CleanError, ExtractError, ModelError, SessionError};
pub use extractor::{
    digest_bytes, extract_document, join_pages, LopdfExtractor, PageText, PdfExtractor, RawDocument,
};
pub use invoker::ModelInvoker;
pub use models::{GeneratorConfig, LoadedDocument, PromptKind};
pub use prompts::{build_prompt, question_prompt, summary_prompt, SUMMARY_INSTRUCTION};
pub use session::Session;
pub use traits::TextGenerator;
