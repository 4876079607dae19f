//! Collection item and field operations

pub mod enum_cases;
pub mod service;

pub use enum_cases::EnumCaseResolver;
pub use service::{
    CollectionService, CreatedField, FieldSetupReport, ItemView, ItemsView, MappedItem, RawItem,
    RemovalReport,
};
pub use service::require_collection_id;
