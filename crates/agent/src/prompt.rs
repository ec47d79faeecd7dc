//! Prompt templates for the reasoning loop.
//!
//! The format-constraints section is load-bearing: the output parser
//! only understands the `Thought:` / `Action:` / `Final Answer:` labels
//! this template demands, so the two must be kept in sync.

use chrono::Utc;

pub struct PromptTemplate;

impl PromptTemplate {
    /// The main ReAct prompt: user input, tool descriptions, and the
    /// loop's history so far.
    pub fn reasoning(user_input: &str, tools_description: &str, chat_history: &str) -> String {
        let current_time = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let history = if chat_history.is_empty() {
            "No previous conversation"
        } else {
            chat_history
        };

        format!(
            "Current time: {current_time}\n\
             \n\
             You are a helpful AI assistant, able to assist with a wide range of tasks, \
             from answering simple questions to providing in-depth explanations. \
             You can call tools to gather information before answering.\n\
             \n\
             You have access to the following tools:\n\
             {tools_description}\n\
             \n\
             You MUST use the following format to respond:\n\
             Thought: describe the problem you need to solve next, and whether you need a tool.\n\
             If you can respond directly to the user without using a tool, reply:\n\
             Final Answer: string \\ put your final response here.\n\
             If you need to use a tool, reply:\n\
             Action: a JSON object naming the tool and its inputs, for example \
             {{\"tool\": \"calculator\", \"parameters\": {{\"expression\": \"2+2\"}}}}\n\
             Observation: the result of the action\n\
             Thought: a new round of thinking\n\
             ...\n\
             Thought/Action/Observation can repeat several times until you no longer \
             need any tool. At that point, reply:\n\
             Thought: I now know the final answer.\n\
             Final Answer: string \\ put your final response here.\n\
             If you do not reply in this format, you may cause a programming error.\n\
             \n\
             The chat history between the user and the AI:\n\
             {history}\n\
             \n\
             The user's new input:\n\
             Human: {user_input}\n"
        )
    }

    /// The lightweight-model prompt: turn a thought into a single JSON
    /// tool call.
    pub fn tool_json(thought: &str, tools_description: &str) -> String {
        format!(
            "You have access to the following tools:\n\
             {tools_description}\n\
             \n\
             Convert the thought below into exactly one JSON object of the form\n\
             {{\"tool\": string, \"parameters\": object}}\n\
             naming the tool to use and its inputs. Use true and false for booleans. \
             Only one JSON object may appear in your response.\n\
             \n\
             Thought: {thought}\n"
        )
    }
}
