//! Prompt construction for judgment requests.

use crate::llm::types::Message;

/// System prompt constraining the answer to a closed label set.
const CLASSIFICATION_SYSTEM_PROMPT: &str = r#"You are reviewing a text-to-Cypher training dataset for a Neo4j graph database.

Answer the user's request with exactly one of the following labels and nothing else:
{labels}

Do not explain your choice. Do not add punctuation or quotes."#;

/// Builds the system prompt listing the allowed labels.
pub fn build_system_prompt(labels: &[&str]) -> String {
    let label_lines = labels
        .iter()
        .map(|label| format!("- {}", label))
        .collect::<Vec<_>>()
        .join("\n");
    CLASSIFICATION_SYSTEM_PROMPT.replace("{labels}", &label_lines)
}

/// Builds the message list for a closed-label judgment.
pub fn build_messages(instruction: &str, labels: &[&str]) -> Vec<Message> {
    vec![
        Message::system(build_system_prompt(labels)),
        Message::user(instruction),
    ]
}

/// Instruction asking whether a question is vague.
pub fn clarity_instruction(question: &str) -> String {
    format!(
        "determine if the given user question is vague or not: {}",
        question
    )
}

/// Instruction asking whether a query answers a question.
///
/// The schema may be missing or unhelpful; the model is told so.
pub fn fidelity_instruction(question: &str, cypher_query: &str, schema: Option<&str>) -> String {
    format!(
        "determine whether given Cypher query semantically reflects the intent of user question or not \
         (schema would be provided but could be useless. you make your choice):\n\
         user question:\n{}\nCypher query:\n{}\nschema:{}",
        question,
        cypher_query,
        schema.unwrap_or("")
    )
}
