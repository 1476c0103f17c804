//! Grounded prompt construction for the downstream language model.

/// Answer the model must give when the documents do not contain one.
pub const FALLBACK_ANSWER: &str = "I don't know based on the provided documents.";

/// Wrap `question` with retrieved `context`.
///
/// Blank context yields the question unchanged.
pub fn grounded_prompt(question: &str, context: &str) -> String {
    if context.trim().is_empty() {
        return question.to_string();
    }

    format!(
        "You are a helpful assistant. Below is content from uploaded documents. \
         Please use this content to answer the user's questions accurately.\n\n\
         --- DOCUMENT CONTENT ---\n\
         {context}\n\
         --- END OF DOCUMENT CONTENT ---\n\n\
         Now, answer the user's question based ONLY on the document content above.\n\
         If the answer is not found in the provided documents, you must respond with exactly: \"{FALLBACK_ANSWER}\"\n\
         Do not hallucinate or use outside knowledge.\n\n\
         User Question: {question}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_context_passes_question_through() {
        assert_eq!(grounded_prompt("What is RAG?", ""), "What is RAG?");
        assert_eq!(grounded_prompt("What is RAG?", "  \n"), "What is RAG?");
    }

    #[test]
    fn test_context_is_delimited() {
        let p = grounded_prompt("Who won?", "[Source: a.txt]\nBlue team won.");
        assert!(p.starts_with("You are a helpful assistant."));
        assert!(p.contains(
            "--- DOCUMENT CONTENT ---\n[Source: a.txt]\nBlue team won.\n--- END OF DOCUMENT CONTENT ---"
        ));
        assert!(p.contains("respond with exactly: \"I don't know based on the provided documents.\""));
        assert!(p.ends_with("User Question: Who won?"));
    }
}
