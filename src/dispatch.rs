//! Answer dispatch: routes a classified query outcome to the deterministic
//! formatter, the clarify formatter, or the completion provider.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::providers::CompletionProvider;
use crate::query::models::QueryOutcome;
use crate::timetable::{format_clarify, format_full_timetable};

const SYSTEM_INSTRUCTION: &str = "You answer school timetable questions. \
You receive the user's question and a JSON snippet of matching timetable data. \
Answer concisely from the data alone; if the data does not contain the answer, say so.";

/// How an answer was produced. Clients use this to style responses
/// (e.g. render clarify prompts as an interactive picker).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    Formatter,
    Clarify,
    Completion,
}

/// Rendered answer text plus its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
}

/// Routes query outcomes to a renderer.
///
/// Holds its completion provider by injected trait object: every server
/// variant (one provider, several, stub) is this one type with different
/// construction.
pub struct AnswerDispatcher {
    completion: Arc<dyn CompletionProvider>,
}

impl AnswerDispatcher {
    pub fn new(completion: Arc<dyn CompletionProvider>) -> Self {
        Self { completion }
    }

    /// Produces the final answer text for one question/outcome pair.
    ///
    /// Timetable and clarify outcomes render deterministically and cannot
    /// fail; only the free-form path can surface a provider error.
    pub async fn answer(
        &self,
        question: &str,
        outcome: QueryOutcome,
    ) -> Result<Answer, anyhow::Error> {
        match outcome {
            QueryOutcome::FullTimetable {
                timetable,
                title,
                notes,
                teachers,
            } => {
                debug!(rows = timetable.rows.len(), "rendering full timetable");
                Ok(Answer {
                    text: format_full_timetable(
                        &timetable,
                        title.as_deref(),
                        notes.as_deref(),
                        &teachers,
                    ),
                    source: AnswerSource::Formatter,
                })
            }
            QueryOutcome::Clarify(descriptor) => Ok(Answer {
                text: format_clarify(&descriptor, question),
                source: AnswerSource::Clarify,
            }),
            QueryOutcome::Results(results) => {
                let snippet = serde_json::to_string_pretty(&results)
                    .unwrap_or_else(|_| results.to_string());
                let prompt = format!("Question: {question}\n\nData:\n```json\n{snippet}\n```");
                let text = self.completion.complete(SYSTEM_INSTRUCTION, &prompt).await?;
                Ok(Answer {
                    text,
                    source: AnswerSource::Completion,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::models::{ClarifyDescriptor, TimetablePayload};
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoCompletion;

    #[async_trait]
    impl CompletionProvider for EchoCompletion {
        async fn complete(&self, _system: &str, user: &str) -> Result<String, anyhow::Error> {
            Ok(format!("echo: {user}"))
        }
    }

    fn dispatcher() -> AnswerDispatcher {
        AnswerDispatcher::new(Arc::new(EchoCompletion))
    }

    #[tokio::test]
    async fn full_timetable_uses_the_formatter() {
        let outcome = QueryOutcome::FullTimetable {
            timetable: TimetablePayload::default(),
            title: None,
            notes: None,
            teachers: vec![],
        };
        let answer = dispatcher().answer("q", outcome).await.unwrap();
        assert_eq!(answer.source, AnswerSource::Formatter);
        assert_eq!(answer.text, "No timetable entries found for Teacher.");
    }

    #[tokio::test]
    async fn clarify_renders_without_touching_the_provider() {
        let outcome = QueryOutcome::Clarify(ClarifyDescriptor {
            message: "Multiple matches".to_owned(),
            candidates: vec!["A".to_owned(), "B".to_owned()],
            ..Default::default()
        });
        let answer = dispatcher().answer("who?", outcome).await.unwrap();
        assert_eq!(answer.source, AnswerSource::Clarify);
        assert!(answer.text.contains("- A"));
    }

    #[tokio::test]
    async fn free_form_results_go_through_the_completion_provider() {
        let outcome = QueryOutcome::Results(json!({"rows": []}));
        let answer = dispatcher().answer("how many?", outcome).await.unwrap();
        assert_eq!(answer.source, AnswerSource::Completion);
        assert!(answer.text.starts_with("echo: Question: how many?"));
        assert!(answer.text.contains("```json"));
    }
}
