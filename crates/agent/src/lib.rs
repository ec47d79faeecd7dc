//! The core reasoning loop for Cogito.
//!
//! The agent follows the **ReAct** cycle:
//!
//! 1. **Render** a prompt from the user input, the tool descriptions,
//!    and the history accumulated so far
//! 2. **Complete** it via the model hub (with single-shot fallback)
//! 3. **Parse** the completion into a Thought, Action, or Final Answer
//! 4. **If Action**: execute the tool, fold the observation back into
//!    the history, and loop
//! 5. **If Final Answer**: return it
//!
//! The loop continues until a final answer is produced or the iteration
//! budget (default 5) is exhausted, in which case a fixed apology is
//! returned — unrecoverable reasoning is a normal outcome, not an
//! error.

pub mod parser;
pub mod prompt;
pub mod react;
pub mod runtime;

pub use parser::{OutputParser, ParsedResponse};
pub use prompt::PromptTemplate;
pub use react::{APOLOGY, ReactAgent, SolveResult};
pub use runtime::{AgentRuntime, UserAgent};
