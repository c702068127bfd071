use shared::protocol::CategoryListResponse;
use tokio::sync::RwLock;

use crate::{answer_token::AnswerSigner, opentdb::OpenTdbClient};

pub(crate) struct AppState {
    pub(crate) upstream: OpenTdbClient,
    pub(crate) signer: AnswerSigner,
    /// Filled by the first successful category fetch and never refreshed.
    pub(crate) categories: RwLock<Option<CategoryListResponse>>,
}

impl AppState {
    pub(crate) fn new(upstream: OpenTdbClient, signer: AnswerSigner) -> Self {
        Self {
            upstream,
            signer,
            categories: RwLock::new(None),
        }
    }
}
