//! Domain types and models
//!
//! - [`items`]: desired items, remote items, change sets, sync records
//! - [`fields`]: field schema, enum cases and field inputs
//! - [`project`]: project, publish and deployment records

pub mod fields;
pub mod items;
pub mod project;

pub use fields::{raw_field_value, EnumCase, EnumCaseResolution, FieldDefinition, FieldInput, FieldType};
pub use items::{
    ChangeSet, CollectionItem, DesiredItem, FieldData, RemoteItemSummary, SyncMode, SyncRecord,
};
pub use project::{
    ChangedPaths, CollectionSummary, Deployment, Hostname, ProductionRelease, ProjectInfo,
    PublishResult,
};
