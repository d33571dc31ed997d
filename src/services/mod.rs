pub mod composer;
pub mod context;
pub mod deadline;
pub mod fallback;
pub mod llm;
pub mod pipeline;
pub mod retry;
pub mod search;
pub mod summarizer;

pub use composer::QueryComposer;
pub use fallback::FallbackGenerator;
pub use pipeline::Pipeline;
pub use summarizer::Summarizer;
