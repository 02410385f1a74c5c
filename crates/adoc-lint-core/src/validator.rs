//! Entry points: validate one document or many.

use crate::document::Document;
use crate::metadata::validate_metadata;
use crate::model::RuleModel;
use crate::structure::validate_structure;
use crate::types::{ValidationResult, ValidationResultBuilder};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;
use tracing::info;

/// Validates one document against a rule model.
///
/// Metadata findings come first, then structural findings in document
/// order. Never panics on malformed trees; faults become findings.
#[must_use]
pub fn validate(document: &Document, model: &RuleModel) -> ValidationResult {
    info!("Validating {}", document.path().display());
    let mut builder = ValidationResultBuilder::new();
    builder.scanned(document.path());
    builder.extend(validate_metadata(document, model.metadata()));
    builder.extend(validate_structure(document, model));
    let result = builder.build();
    info!(
        "{}: {} error(s), {} warning(s), {} info(s) in {:?}",
        document.path().display(),
        result.error_count(),
        result.warning_count(),
        result.info_count(),
        result.duration()
    );
    result
}

/// Validates documents against a shared rule model.
#[derive(Debug, Clone)]
pub struct Validator {
    model: Arc<RuleModel>,
    workers: usize,
}

impl Validator {
    /// Creates a validator using all available cores.
    #[must_use]
    pub fn new(model: Arc<RuleModel>) -> Self {
        let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        Self { model, workers }
    }

    /// Limits the number of worker threads (at least one).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Returns the rule model.
    #[must_use]
    pub fn model(&self) -> &RuleModel {
        &self.model
    }

    /// Validates one document.
    #[must_use]
    pub fn validate(&self, document: &Document) -> ValidationResult {
        validate(document, &self.model)
    }

    /// Validates many documents in parallel.
    ///
    /// Results are merged in input order, so the output does not depend on
    /// scheduling.
    #[must_use]
    pub fn validate_all(&self, documents: &[Document]) -> ValidationResult {
        if documents.len() <= 1 || self.workers == 1 {
            return ValidationResult::merge(documents.iter().map(|d| self.validate(d)));
        }

        let chunk_size = documents.len().div_ceil(self.workers);
        info!(
            "Validating {} documents on {} worker(s)",
            documents.len(),
            documents.len().div_ceil(chunk_size)
        );
        let model: &RuleModel = &self.model;
        let per_chunk: Vec<Vec<ValidationResult>> = thread::scope(|scope| {
            let handles: Vec<_> = documents
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|d| validate(d, model))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(results) => results,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        });
        ValidationResult::merge(per_chunk.into_iter().flatten())
    }
}
