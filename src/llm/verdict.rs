//! Closed-label classification over free-text completions.
//!
//! A [`Verdict`] is a small enum whose variants each own one label. The model
//! is asked to answer with a label; anything outside the set is an error.

use crate::error::{CleanupError, Result};
use crate::llm::{prompt, LlmClient};
use tracing::debug;

/// A closed set of answers the model may give.
pub trait Verdict: Sized + Copy + 'static {
    /// Every variant, in prompt order.
    const VARIANTS: &'static [Self];

    /// The label the model must answer with for this variant.
    fn label(&self) -> &'static str;

    /// All labels, in prompt order.
    fn labels() -> Vec<&'static str> {
        Self::VARIANTS.iter().map(Verdict::label).collect()
    }

    /// The variant whose label equals `label` exactly.
    fn from_label(label: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.label() == label)
    }
}

/// Whether a question is specific enough to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionClarity {
    Vague,
    Clear,
}

impl Verdict for QuestionClarity {
    const VARIANTS: &'static [Self] = &[Self::Vague, Self::Clear];

    fn label(&self) -> &'static str {
        match self {
            Self::Vague => "vague",
            Self::Clear => "clear",
        }
    }
}

/// Whether a query captures the intent of its question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFidelity {
    Reflects,
    DoesNotReflect,
}

impl Verdict for QueryFidelity {
    const VARIANTS: &'static [Self] = &[Self::Reflects, Self::DoesNotReflect];

    fn label(&self) -> &'static str {
        match self {
            Self::Reflects => "yes it reflects",
            Self::DoesNotReflect => "no it doesn't reflect",
        }
    }
}

/// Asks the model to judge `instruction` and parses its answer into `V`.
pub async fn classify<V: Verdict>(client: &dyn LlmClient, instruction: &str) -> Result<V> {
    let labels = V::labels();
    let messages = prompt::build_messages(instruction, &labels);
    let output = client.choose(&messages, &labels).await?;

    let normalized = normalize_answer(&output);
    debug!("Model answered {:?}", normalized);

    V::from_label(&normalized).ok_or_else(|| CleanupError::classification(output.trim(), labels))
}

/// Lower-cases the answer and strips surrounding quotes and a trailing period.
fn normalize_answer(output: &str) -> String {
    output
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '`' | '“' | '”'))
        .trim()
        .trim_end_matches('.')
        .trim()
        .replace('’', "'")
        .to_lowercase()
}
