//! The fixed two-message prompt sent with every report request

use minijinja::{Environment, context};
use report_llm::Message;
use serde::Serialize;

use crate::aggregate::AggregatedPayload;

/// Instruction given to the model as the system message
pub const SYSTEM_PROMPT: &str = "You are a trading guru. Given data on share prices over the past 3 days, write a report of no more than 150 words describing the stock performance and recommending whether to buy, hold, or sell. Use the examples provided between ### to match the tone and style.";

/// Few-shot reports used only to set tone. They carry no market data.
pub const STYLE_EXAMPLES: [&str; 2] = [
    "OK baby, hold on tight! You are going to haate this! Over the past three days, Tesla (TSLA) shares have plummetted. The stock opened at $223.98 and closed at $202.11 on the third day...",
    "Apple (AAPL) is the supernova in the stock sky – it shot up from $150.22 to a jaw-dropping $175.36 by the close of day three...",
];

const USER_TEMPLATE: &str =
    "{{ data }}\n###{% for example in examples %}\n{{ example }}\n###{% endfor %}";

/// Body of a report request: `{ "messages": [system, user] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPrompt {
    messages: Vec<Message>,
}

impl ReportPrompt {
    /// Build the system instruction and the user message embedding `payload`
    pub fn build(payload: &AggregatedPayload) -> Result<Self, minijinja::Error> {
        let env = Environment::new();
        let user = env.render_str(
            USER_TEMPLATE,
            context! {
                data => payload.as_str(),
                examples => STYLE_EXAMPLES,
            },
        )?;

        Ok(Self {
            messages: vec![Message::system(SYSTEM_PROMPT), Message::user(user)],
        })
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}
