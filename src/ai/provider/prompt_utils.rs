//! Prompt building utilities for LLM providers.

use crate::improver::GenerationRequest;

/// Instructions sent as the system message (OpenAI) or `system` field (Ollama)
pub const SYSTEM_PROMPT: &str = "You are a code documentation expert. \
Reply with the documentation text only: no comment markers, no code fences, \
no restating of the code. Keep it concise: a one-sentence summary, then \
parameter and return notes only when they add information.";

/// Build the user prompt for one undocumented construct
pub fn doc_prompt(request: &GenerationRequest<'_>) -> String {
    format!(
        "Write the documentation for the {} {} `{}` in this {} source.\n\n```{}\n{}\n```",
        request.language,
        request.kind.as_str().replace('_', " "),
        request.name,
        request.language,
        request.language.tag(),
        request.context.trim_end()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{ConstructKind, Language};

    #[test]
    fn test_doc_prompt_mentions_construct() {
        let request = GenerationRequest {
            kind: ConstructKind::ModuleHeader,
            name: "loader",
            language: Language::Python,
            context: "import os\n\n".to_string(),
        };
        let prompt = doc_prompt(&request);

        assert!(prompt.contains("module header `loader`"));
        assert!(prompt.contains("```python\nimport os\n```"));
    }
}
