//! Schema discovery and the facet dictionary built from it.

use std::sync::Mutex;

use common::{
    api_error::ApiError,
    facet_dictionary::{FacetDefinition, FacetDictionary, FacetDictionaryCache, Schemas},
    search_result::CompoundSearchResponse,
};
use once_cell::sync::Lazy;

use crate::{api::filter_sets::form_query, portal_utils::portal_client::PortalClient};

static FACET_DICTIONARY_CACHE: Lazy<Mutex<FacetDictionaryCache>> = Lazy::new(|| Mutex::new(FacetDictionaryCache::default()));

pub async fn get_schemas(client: &PortalClient) -> Result<Schemas, ApiError> {
    client.get_json("/profiles/").await
}

/// Facets the search endpoint declares for a type.
pub async fn get_search_facets(client: &PortalClient, search_type: &str) -> Result<Vec<FacetDefinition>, ApiError> {
    let query = form_query(&[("type", search_type), ("limit", "0")]);
    match client.get_json::<CompoundSearchResponse>(&format!("/search/?{}", query)).await {
        Ok(response) => Ok(response.facets),
        Err(ApiError::NotFound { .. }) => Ok(vec![]),
        Err(e) => Err(e),
    }
}

/// Facet dictionary for a search type. Rebuilt only when the schemas or the
/// declared facets differ from the previous call.
pub async fn get_facet_dictionary(client: &PortalClient, search_type: &str) -> Result<FacetDictionary, ApiError> {
    let (schemas, facets) = futures::try_join!(get_schemas(client), get_search_facets(client, search_type))?;
    let mut cache = FACET_DICTIONARY_CACHE
        .lock()
        .map_err(|_| ApiError::Server { status: 500, message: "facet dictionary cache poisoned".to_string() })?;
    Ok(cache.get(Some(&schemas), search_type, &facets).clone())
}
