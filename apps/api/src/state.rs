use std::sync::Arc;

use crate::llm_client::GenerationClient;
use crate::models::{CoverLetter, Record, Resume};
use crate::store::Repository;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub generator: GenerationClient,
    pub resumes: Arc<dyn Repository<Resume>>,
    pub cover_letters: Arc<dyn Repository<CoverLetter>>,
}

/// Lets the record handlers stay generic over the record kind.
pub trait RepositoryFor<R: Record> {
    fn repository(&self) -> &dyn Repository<R>;
}

impl RepositoryFor<Resume> for AppState {
    fn repository(&self) -> &dyn Repository<Resume> {
        self.resumes.as_ref()
    }
}

impl RepositoryFor<CoverLetter> for AppState {
    fn repository(&self) -> &dyn Repository<CoverLetter> {
        self.cover_letters.as_ref()
    }
}
