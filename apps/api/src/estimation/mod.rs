// Project estimator: prompt builders, display calculations, and the two
// protected endpoints that send the prompts to the LLM.
// All LLM calls go through llm_client.

pub mod calculations;
pub mod handlers;
pub mod prompts;
