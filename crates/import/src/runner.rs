//! Run driver.
//!
//! Checks the headers of every record up front, then feeds the records one at
//! a time through a pipeline. Recoverable errors are collected in the
//! [`ImportReport`] and the run moves on; a fatal error stops the run and is
//! returned as is.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use catalog_infra::{AttributeCodesProvider, ImageTypesProvider};

use crate::changes::ChangeSet;
use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::reconcile::{AssociationReconciler, Lookups, ProductRecordReconciler, RecordOutcome};
use crate::record::{AssociationRecord, RawRecord, fields};
use crate::schema::{ImportSchema, validate_association_headers};
use crate::transform::TransformerPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pipeline {
    Products,
    Associations,
}

/// A record that was skipped because of a recoverable error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    /// 1-based position in the input.
    pub line: usize,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub pipeline: Pipeline,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Products created by standalone records.
    pub created: usize,
    pub failures: Vec<RecordFailure>,
    /// Applied mutations by kind (`catalog.variant.created`, ...).
    pub mutations: BTreeMap<String, usize>,
    pub skips: BTreeMap<String, usize>,
}

impl ImportReport {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            started_at: Utc::now(),
            finished_at: None,
            processed: 0,
            succeeded: 0,
            failed: 0,
            created: 0,
            failures: Vec::new(),
            mutations: BTreeMap::new(),
            skips: BTreeMap::new(),
        }
    }

    pub fn mutation_count(&self, kind: &str) -> usize {
        self.mutations.get(kind).copied().unwrap_or(0)
    }

    pub fn skip_count(&self, reason: &str) -> usize {
        self.skips.get(reason).copied().unwrap_or(0)
    }

    fn absorb(&mut self, outcome: &RecordOutcome) {
        self.succeeded += 1;
        if outcome.created {
            self.created += 1;
        }
        self.absorb_changes(&outcome.changes);
    }

    fn absorb_changes(&mut self, changes: &ChangeSet) {
        for mutation in changes.mutations() {
            *self.mutations.entry(mutation.kind().to_string()).or_default() += 1;
        }
        for skip in changes.skips() {
            *self.skips.entry(skip.reason.as_str().to_string()).or_default() += 1;
        }
    }

    fn fail(&mut self, line: usize, code: &str, error: &ImportError) {
        tracing::warn!(line, code, error = %error, "record skipped");
        self.failed += 1;
        self.failures.push(RecordFailure {
            line,
            code: code.to_string(),
            message: error.to_string(),
        });
    }

    fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        tracing::info!(
            pipeline = ?self.pipeline,
            processed = self.processed,
            succeeded = self.succeeded,
            failed = self.failed,
            "import finished"
        );
        self
    }
}

/// Runs the product and association pipelines against one set of lookups.
pub struct ImportRunner<'a> {
    lookups: Lookups<'a>,
    attribute_codes: &'a dyn AttributeCodesProvider,
    image_types: &'a dyn ImageTypesProvider,
    config: ImportConfig,
    transformers: TransformerPool,
}

impl<'a> ImportRunner<'a> {
    pub fn new(
        lookups: Lookups<'a>,
        attribute_codes: &'a dyn AttributeCodesProvider,
        image_types: &'a dyn ImageTypesProvider,
        config: ImportConfig,
    ) -> Self {
        let transformers = TransformerPool::with_defaults(config.list_delimiter);
        Self {
            lookups,
            attribute_codes,
            image_types,
            config,
            transformers,
        }
    }

    pub fn with_transformers(mut self, transformers: TransformerPool) -> Self {
        self.transformers = transformers;
        self
    }

    pub fn run_products<I>(&self, records: I) -> Result<ImportReport, ImportError>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut report = ImportReport::new(Pipeline::Products);
        let schema = ImportSchema::load(&self.config, self.attribute_codes, self.image_types)?;
        let records: Vec<RawRecord> = records.into_iter().collect();
        check_headers(&records, fields::CODE, |raw| schema.validate_headers(raw.keys()))?;

        let reconciler =
            ProductRecordReconciler::new(self.lookups, &schema, &self.config, &self.transformers);

        for (idx, raw) in records.iter().enumerate() {
            let line = idx + 1;
            report.processed += 1;
            match reconciler.reconcile(raw) {
                Ok(outcome) => report.absorb(&outcome),
                Err(err) if err.is_fatal() => {
                    tracing::error!(line, code = raw.get(fields::CODE), error = %err, "import aborted");
                    return Err(err);
                }
                Err(err) => report.fail(line, raw.get(fields::CODE), &err),
            }
        }

        Ok(report.finish())
    }

    pub fn run_associations<I>(&self, records: I) -> Result<ImportReport, ImportError>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut report = ImportReport::new(Pipeline::Associations);
        let reconciler =
            AssociationReconciler::new(self.lookups, self.config.association_type_code.as_str());

        let records: Vec<RawRecord> = records.into_iter().collect();
        check_headers(&records, fields::PRODUCT_CODE, |raw| {
            validate_association_headers(raw.keys())
        })?;

        for (idx, raw) in records.iter().enumerate() {
            let line = idx + 1;
            report.processed += 1;
            match reconciler.reconcile(&AssociationRecord::parse(raw, &self.config)) {
                Ok(outcome) => report.absorb(&outcome),
                Err(err) if err.is_fatal() => {
                    tracing::error!(line, code = raw.get(fields::PRODUCT_CODE), error = %err, "import aborted");
                    return Err(err);
                }
                Err(err) => report.fail(line, raw.get(fields::PRODUCT_CODE), &err),
            }
        }

        Ok(report.finish())
    }
}

/// Fails on the first record whose columns do not satisfy `validate`.
fn check_headers(
    records: &[RawRecord],
    code_field: &str,
    validate: impl Fn(&RawRecord) -> Result<(), ImportError>,
) -> Result<(), ImportError> {
    for (idx, raw) in records.iter().enumerate() {
        if let Err(err) = validate(raw) {
            tracing::error!(line = idx + 1, code = raw.get(code_field), error = %err, "import aborted");
            return Err(err);
        }
    }
    Ok(())
}
