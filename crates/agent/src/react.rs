//! The ReAct reasoning loop — Thought → Action → Observation cycles
//! until a Final Answer or the iteration budget runs out.
//!
//! The loop is stateless between invocations: each `solve` call builds
//! a transient session, renders a fresh prompt per iteration from the
//! user input + tool descriptions + history-so-far, and hands the
//! completion to the output parser.
//!
//! Failure policy:
//! - Tool-level failures (unknown tool, handler error) become
//!   observations; the loop continues so the model can self-correct.
//! - Parse failures and exhausted provider fallback abort the loop.
//! - `solve` itself never fails: an aborted or exhausted loop returns a
//!   fixed apology instead.

use crate::parser::{OutputParser, ParsedResponse};
use crate::prompt::PromptTemplate;
use cogito_core::tool::ToolRegistry;
use cogito_core::turn::ConversationTurn;
use cogito_providers::ModelHub;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Returned when the loop cannot produce a final answer.
pub const APOLOGY: &str =
    "I apologize, but I was unable to complete the task within the allowed iterations.";

/// The outcome of one `solve` invocation.
#[derive(Debug, Clone, Serialize)]
pub struct SolveResult {
    /// The answer text (or the fixed apology)
    pub final_answer: String,

    /// The full reasoning history, useful for audit and logging
    pub history: Vec<ConversationTurn>,

    /// How many completion calls the loop consumed
    pub iterations: usize,
}

/// The ReAct agent: a model hub, a tool registry, and a parser.
pub struct ReactAgent {
    hub: Arc<ModelHub>,
    tools: Arc<ToolRegistry>,
    parser: OutputParser,
    max_iterations: usize,
}

impl ReactAgent {
    pub fn new(hub: Arc<ModelHub>, tools: Arc<ToolRegistry>) -> Self {
        Self {
            hub,
            tools,
            parser: OutputParser::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Run the reasoning loop over a user input.
    ///
    /// Never fails: every outcome, including provider errors and
    /// unparseable completions, is folded into the returned result.
    pub async fn solve(&self, user_input: &str) -> SolveResult {
        let session = Uuid::new_v4();
        let mut history: Vec<ConversationTurn> = Vec::new();
        let mut iterations = 0usize;
        let mut final_answer: Option<String> = None;

        info!(%session, max_iterations = self.max_iterations, "ReAct loop starting");

        while iterations < self.max_iterations && final_answer.is_none() {
            let chat_history = history
                .iter()
                .map(ConversationTurn::render)
                .collect::<Vec<_>>()
                .join("\n");
            let prompt = PromptTemplate::reasoning(
                user_input,
                &self.tools.describe_all(),
                &chat_history,
            );

            let completion = match self.hub.complete(&prompt, &[]).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(%session, error = %e, "Provider failed after fallback, aborting loop");
                    break;
                }
            };

            match self.parser.parse(&completion) {
                Ok(ParsedResponse::Thought { content }) => {
                    debug!(%session, iteration = iterations, "Thought recorded");
                    history.push(ConversationTurn::assistant(format!("Thought: {content}")));
                }

                Ok(ParsedResponse::Action {
                    thought,
                    tool,
                    parameters,
                }) => {
                    if let Some(thought) = thought {
                        history.push(ConversationTurn::assistant(format!("Thought: {thought}")));
                    }
                    info!(%session, tool = %tool, "Action: using tool");
                    history.push(ConversationTurn::assistant(format!(
                        "Action: using tool {tool}"
                    )));

                    let observation = match self.tools.execute(&tool, parameters).await {
                        Ok(output) => {
                            format!("Observation: {}", self.parser.format_observation(&output))
                        }
                        Err(e) => {
                            warn!(%session, tool = %tool, error = %e, "Tool execution failed");
                            format!("Observation: Error executing tool: {e}")
                        }
                    };
                    debug!(%session, "Observation recorded");
                    history.push(ConversationTurn::system(observation));
                }

                Ok(ParsedResponse::FinalAnswer { content }) => {
                    info!(%session, iteration = iterations, "Final answer produced");
                    history.push(ConversationTurn::assistant(format!(
                        "Final Answer: {content}"
                    )));
                    final_answer = Some(content);
                }

                Err(e) => {
                    error!(%session, error = %e, "Failed to parse model response, aborting loop");
                    break;
                }
            }

            iterations += 1;
        }

        if final_answer.is_none() {
            warn!(%session, iterations, "Loop ended without a final answer");
        }

        SolveResult {
            final_answer: final_answer.unwrap_or_else(|| APOLOGY.to_string()),
            history,
            iterations,
        }
    }

    /// Convenience wrapper: run the loop and project out the answer.
    pub async fn process_message(&self, user_input: &str) -> String {
        self.solve(user_input).await.final_answer
    }

    /// Ask the lightweight model to turn a thought into a JSON tool
    /// call. The raw JSON text is returned for the caller to decode.
    pub async fn propose_action(
        &self,
        thought: &str,
    ) -> Result<String, cogito_core::error::ProviderError> {
        let prompt = PromptTemplate::tool_json(thought, &self.tools.describe_all());
        self.hub.complete_json(&prompt).await
    }
}
