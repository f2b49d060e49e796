//! `catalog-import`: reconciles flat import records into the catalog.
//!
//! Two pipelines share the domain model:
//!
//! - products: a record is either a standalone product or a variant of an
//!   existing product ([`ImportRecord`]); see [`ProductRecordReconciler`].
//! - associations: owner code + associated product codes; see
//!   [`AssociationReconciler`].
//!
//! [`ImportRunner`] drives either pipeline over a sequence of records and
//! returns an [`ImportReport`].

pub mod changes;
pub mod coerce;
pub mod config;
pub mod error;
pub mod reconcile;
pub mod record;
pub mod runner;
pub mod schema;
pub mod transform;

pub use changes::{ChangeSet, Mutation, Skip, SkipReason};
pub use config::{ImportConfig, OriginalPricePolicy};
pub use error::{ImportError, Severity};
pub use reconcile::{
    AssociationReconciler, AttributeReconciler, ChannelPricingReconciler, DetailReconciler,
    ImageReconciler, Lookups, ProductRecordReconciler, RecordOutcome, TaxonomyLinker,
    VariantReconciler,
};
pub use record::{AssociationRecord, ImportRecord, ProductRow, RawRecord};
pub use runner::{ImportReport, ImportRunner, Pipeline, RecordFailure};
pub use schema::ImportSchema;
pub use transform::{TransformerPool, ValueTransformer};
