//! Text-generation collaborators for termsim.
//!
//! `prompts` renders a `GenerationRequest` into prompt text; the API
//! generators send that text to a model and return its raw reply.

pub mod openai_api_generator;
pub mod prompts;

pub use openai_api_generator::OpenAIApiGenerator;
pub use prompts::render_prompt;
