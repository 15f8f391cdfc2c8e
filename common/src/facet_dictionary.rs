//! Facet lookup table built from schema-declared facets, search response
//! facets and a few synthetic fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AggregationType {
    #[default]
    Terms,
    Stats,
    Range,
    Nested,
}

/// A facet as returned in the `facets` list of a search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FacetDefinition {
    pub field: String,
    pub title: Option<String>,
    pub order: Option<i64>,
    pub aggregation_type: Option<AggregationType>,
    pub description: Option<String>,
    pub grouping: Option<String>,
}

/// A facet entry under `facets` in a type schema from `/profiles/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SchemaFacet {
    pub title: Option<String>,
    pub order: Option<i64>,
    pub aggregation_type: Option<AggregationType>,
    pub description: Option<String>,
    pub grouping: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SchemaColumn {
    pub title: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TypeSchema {
    pub title: Option<String>,
    pub facets: BTreeMap<String, SchemaFacet>,
    pub columns: BTreeMap<String, SchemaColumn>,
}

/// `/profiles/` response: type name -> schema.
pub type Schemas = BTreeMap<String, TypeSchema>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetInfo {
    pub field: String,
    pub title: String,
    pub order: Option<i64>,
    pub aggregation_type: AggregationType,
    pub description: Option<String>,
    pub grouping: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FacetDictionary {
    pub facets: BTreeMap<String, FacetInfo>,
}

const SYNTHETIC_FIELDS: &[(&str, &str)] = &[("q", "Text Search"), ("type", "Item Type")];

impl FacetDictionary {
    pub fn get(&self, field: &str) -> Option<&FacetInfo> {
        self.facets.get(field)
    }

    /// Display title for a field, falling back to the field name.
    pub fn title_for<'a>(&'a self, field: &'a str) -> &'a str {
        self.facets.get(field).map(|f| f.title.as_str()).unwrap_or(field)
    }

    pub fn order_for(&self, field: &str) -> Option<i64> {
        self.facets.get(field).and_then(|f| f.order)
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}

pub fn build_facet_dictionary(schemas: Option<&Schemas>, search_type: &str, facets: &[FacetDefinition]) -> FacetDictionary {
    let mut dictionary = FacetDictionary::default();

    if let Some(schema) = schemas.and_then(|s| s.get(search_type)) {
        for (field, facet) in &schema.facets {
            let column_title = schema.columns.get(field).and_then(|c| c.title.clone());
            dictionary.facets.insert(field.clone(), FacetInfo {
                field: field.clone(),
                title: facet.title.clone().or(column_title).unwrap_or_else(|| field.clone()),
                order: facet.order,
                aggregation_type: facet.aggregation_type.unwrap_or_default(),
                description: facet.description.clone(),
                grouping: facet.grouping.clone(),
            });
        }
    }

    // search response facets win over the schema where they say something
    for facet in facets {
        if facet.field.is_empty() {
            continue;
        }
        let entry = dictionary.facets.entry(facet.field.clone()).or_insert_with(|| FacetInfo {
            field: facet.field.clone(),
            title: facet.field.clone(),
            order: None,
            aggregation_type: AggregationType::Terms,
            description: None,
            grouping: None,
        });
        if let Some(title) = &facet.title {
            entry.title = title.clone();
        }
        if facet.order.is_some() {
            entry.order = facet.order;
        }
        if let Some(aggregation_type) = facet.aggregation_type {
            entry.aggregation_type = aggregation_type;
        }
        if facet.description.is_some() {
            entry.description = facet.description.clone();
        }
        if facet.grouping.is_some() {
            entry.grouping = facet.grouping.clone();
        }
    }

    for (field, title) in SYNTHETIC_FIELDS {
        dictionary.facets.entry(field.to_string()).or_insert_with(|| FacetInfo {
            field: field.to_string(),
            title: title.to_string(),
            order: None,
            aggregation_type: AggregationType::Terms,
            description: None,
            grouping: None,
        });
    }

    dictionary
}

#[derive(Debug, Clone, PartialEq)]
struct DictionaryInputs {
    schemas: Option<Schemas>,
    search_type: String,
    facets: Vec<FacetDefinition>,
}

/// Memoizes [`build_facet_dictionary`] on its last inputs.
#[derive(Debug, Default)]
pub struct FacetDictionaryCache {
    inputs: Option<DictionaryInputs>,
    dictionary: FacetDictionary,
    builds: usize,
}

impl FacetDictionaryCache {
    pub fn get(&mut self, schemas: Option<&Schemas>, search_type: &str, facets: &[FacetDefinition]) -> &FacetDictionary {
        let unchanged = self.inputs.as_ref().is_some_and(|inputs| {
            inputs.schemas.as_ref() == schemas && inputs.search_type == search_type && inputs.facets == facets
        });
        if !unchanged {
            self.dictionary = build_facet_dictionary(schemas, search_type, facets);
            self.inputs = Some(DictionaryInputs {
                schemas: schemas.cloned(),
                search_type: search_type.to_string(),
                facets: facets.to_vec(),
            });
            self.builds += 1;
        }
        &self.dictionary
    }

    pub fn build_count(&self) -> usize {
        self.builds
    }
}
