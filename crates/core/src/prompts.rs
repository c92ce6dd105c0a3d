use crate::models::PromptKind;

pub const SUMMARY_INSTRUCTION: &str = "Summarize the following educational text in clear, concise, and structured bullet points or numbered sections. Note : Just give the summary without any commentary messages.";

pub fn summary_prompt(text: &str) -> String {
    format!("{SUMMARY_INSTRUCTION}{text}")
}

pub fn question_prompt(text: &str, question: &str) -> String {
    format!("Context: {text}\n\nQuestion: {question}\nAnswer:")
}

pub fn build_prompt(kind: PromptKind, text: &str, question: Option<&str>) -> String {
    match kind {
        PromptKind::Summary => summary_prompt(text),
        PromptKind::Question => question_prompt(text, question.unwrap_or_default()),
    }
}
