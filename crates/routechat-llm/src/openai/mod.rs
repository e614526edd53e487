// OpenAI Assistants API (v2)
// https://platform.openai.com/docs/api-reference/assistants

pub mod client;

pub use client::OpenAIAssistantClient;
