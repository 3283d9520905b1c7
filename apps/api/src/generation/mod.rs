// Document generation: prompt building, the generation call, and cleanup.
// All Gemini calls go through llm_client — no direct HTTP calls here.

pub mod cleanup;
pub mod handlers;
pub mod prompts;
pub mod requests;
