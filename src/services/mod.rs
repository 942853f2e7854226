pub mod collaborators;
pub mod llm_service;
pub mod prompt_channel;
pub mod prompts;
pub mod retrieval_service;

pub use collaborators::{
    ModelService, NoRetrieval, PageRenderer, PromptChannel, RenderedPage, RetrievalService,
    RetrievedContext,
};
pub use llm_service::LlmService;
pub use prompt_channel::ConsolePrompt;
pub use retrieval_service::{collect_files, HttpRetrievalService};
