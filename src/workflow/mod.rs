pub mod form_ctx;
pub mod form_flow;
pub mod gap_detector;
pub mod prefill_url;
pub mod reconcile;

pub use form_ctx::{FormCtx, FormUrl};
pub use form_flow::{FormFlow, FormOutcome, FormRun, PipelineState};
pub use gap_detector::{find_unanswered, merge_resolved};
pub use prefill_url::build_prefilled_url;
pub use reconcile::reconcile_answers;
