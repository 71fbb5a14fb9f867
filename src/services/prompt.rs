//! Prompt templates sent to the generative-answer provider.

/// Single-shot prompt that asks for an answer grounded in `context` with citations.
pub fn cited_prompt(question: &str, context: &str) -> String {
    format!(
        "You are a helpful assistant that answers questions based on the provided context.
Use the following context to answer the question. If you cannot find the answer in the context,
say so clearly. Always cite which part of the context you used.

Context:
{context}

Question: {question}

Answer:"
    )
}

/// Multi-turn prompt that adds the rendered conversation history.
pub fn conversational_prompt(question: &str, context: &str, history: &str) -> String {
    format!(
        "You are a helpful assistant in a conversation. Use the context below to answer questions.

Context:
{context}

Chat History:
{history}

Current Question: {question}

Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cited_prompt_sections_in_order() {
        let prompt = cited_prompt("Why?", "[Document 1] ...");
        let context = prompt.find("Context:\n[Document 1] ...").unwrap();
        let question = prompt.find("Question: Why?").unwrap();
        let answer = prompt.rfind("Answer:").unwrap();
        assert!(context < question && question < answer);
        assert!(prompt.contains("cite"));
    }

    #[test]
    fn test_conversational_prompt_includes_history() {
        let prompt = conversational_prompt("And then?", "[1] passage", "user: hi\nassistant: hello");
        assert!(prompt.contains("Chat History:\nuser: hi\nassistant: hello"));
        assert!(prompt.contains("Current Question: And then?"));
        assert!(prompt.ends_with("Answer:"));
    }
}
