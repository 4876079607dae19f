//! Enum value to case id resolution for the read path
//!
//! Items carry enum values as free text. Values that match no case (stale
//! or removed cases) are left out of the result rather than reported.

use std::collections::{BTreeMap, HashMap};

use framesync_domain::{
    raw_field_value, EnumCaseResolution, FieldData, FieldDefinition, FieldType,
};
use serde_json::Value;

#[derive(Debug)]
struct EnumLookup {
    field_id: String,
    field_name: String,
    by_name: HashMap<String, String>,
    by_name_lower: HashMap<String, String>,
}

impl EnumLookup {
    fn case_id(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .or_else(|| self.by_name_lower.get(&name.to_lowercase()))
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }
}

/// Case lookups for every enum field of a collection
#[derive(Debug, Default)]
pub struct EnumCaseResolver {
    lookups: Vec<EnumLookup>,
}

impl EnumCaseResolver {
    pub fn new(fields: &[FieldDefinition]) -> Self {
        let lookups = fields
            .iter()
            .filter(|field| field.field_type == FieldType::Enum)
            .map(|field| EnumLookup {
                field_id: field.id.clone(),
                field_name: field.name.clone(),
                by_name: field.cases.iter().map(|case| (case.name.clone(), case.id.clone())).collect(),
                by_name_lower: field
                    .cases
                    .iter()
                    .map(|case| (case.name.to_lowercase(), case.id.clone()))
                    .collect(),
            })
            .collect();
        Self { lookups }
    }

    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty()
    }

    /// Resolve string enum values on one item, keyed by field id.
    pub fn resolve(&self, field_data: &FieldData) -> BTreeMap<String, EnumCaseResolution> {
        self.lookups
            .iter()
            .filter_map(|lookup| {
                let entry = field_data.get(&lookup.field_id)?;
                let Value::String(case_name) = raw_field_value(entry) else {
                    return None;
                };
                let case_id = lookup.case_id(case_name)?;
                Some((
                    lookup.field_id.clone(),
                    EnumCaseResolution {
                        field_name: lookup.field_name.clone(),
                        case_name: case_name.clone(),
                        case_id: case_id.to_string(),
                    },
                ))
            })
            .collect()
    }
}
