pub mod portal;
pub mod retrieval_ctx;
pub mod retrieval_flow;
pub mod run_state;

pub use retrieval_ctx::RetrievalCtx;
pub use retrieval_flow::RetrievalFlow;
pub use run_state::RunState;
