//! Server functions wrapping the portal API, plus the client-side decoding of
//! their errors.

use common::{
    access_key::{AccessKey, AccessKeySecret},
    api_error::ApiError,
    app_state::SessionUser,
    case::CaseSummary,
    facet_dictionary::FacetDictionary,
    filter_set::{FilterSet, SavedFilterSet},
    ingestion::IngestionSubmission,
    polling::PollPolicy,
    search_query::CompoundSearchRequest,
    search_result::CompoundSearchResponse,
    variant_sample_list::{VariantSampleList, VariantSampleSelection},
};
use dioxus::prelude::*;

#[cfg(feature = "server")]
fn server_error(e: ApiError) -> ServerFnError {
    let code = match &e {
        ApiError::Validation { .. } => 422,
        ApiError::Permission { .. } => 403,
        ApiError::NotFound { .. } => 404,
        ApiError::Server { status, .. } => *status,
        _ => 500,
    };
    ServerFnError::ServerError { message: e.to_server_message(), code, details: None }
}

#[cfg(feature = "server")]
fn portal_client() -> Result<backend::portal_utils::portal_client::PortalClient, ServerFnError> {
    backend::portal_utils::portal_client::get_portal_client().map_err(server_error)
}

/// Recover the categorized failure from a server function error.
pub fn api_error(e: &ServerFnError) -> ApiError {
    match e {
        ServerFnError::ServerError { message, .. } => ApiError::from_server_message(message),
        other => ApiError::Network { message: other.to_string() },
    }
}

#[server]
pub async fn load_context(href: String) -> Result<serde_json::Value, ServerFnError> {
    let client = portal_client()?;
    backend::api::context::get_context(&client, &href).await.map_err(server_error)
}

#[server]
pub async fn get_session_user() -> Result<Option<SessionUser>, ServerFnError> {
    let client = portal_client()?;
    backend::api::session::get_session_user(&client).await.map_err(server_error)
}

/// The case, the FilterSet to edit for it (blank if the case has none) and
/// the preset that FilterSet was copied from.
#[server]
pub async fn load_filter_set_workbench(case_id: String) -> Result<(CaseSummary, FilterSet, Option<FilterSet>), ServerFnError> {
    let client = portal_client()?;
    let case = backend::api::filter_sets::get_case(&client, &case_id).await.map_err(server_error)?;
    let filter_set = backend::api::filter_sets::load_case_filter_set(&client, &case).await.map_err(server_error)?;
    let origin_preset = backend::api::filter_sets::load_origin_preset(&client, &filter_set).await.map_err(server_error)?;
    Ok((case, filter_set, origin_preset))
}

#[server]
pub async fn save_filter_set(case: CaseSummary, filter_set: FilterSet) -> Result<SavedFilterSet, ServerFnError> {
    let client = portal_client()?;
    backend::api::filter_sets::save_filter_set(&client, &case, &filter_set).await.map_err(server_error)
}

#[server]
pub async fn create_preset(filter_set: FilterSet, title: String, project: Option<String>, user: Option<String>) -> Result<FilterSet, ServerFnError> {
    let client = portal_client()?;
    backend::api::filter_sets::create_preset(&client, &filter_set, &title, project.as_deref(), user.as_deref())
        .await
        .map_err(server_error)
}

#[server]
pub async fn list_presets(project: String, search_type: String) -> Result<Vec<FilterSet>, ServerFnError> {
    let client = portal_client()?;
    backend::api::filter_sets::list_presets(&client, &project, &search_type).await.map_err(server_error)
}

#[server]
pub async fn get_facet_dictionary(search_type: String) -> Result<FacetDictionary, ServerFnError> {
    let client = portal_client()?;
    backend::api::schemas::get_facet_dictionary(&client, &search_type).await.map_err(server_error)
}

#[server]
pub async fn compound_search(request: CompoundSearchRequest) -> Result<CompoundSearchResponse, ServerFnError> {
    let client = portal_client()?;
    backend::api::compound_search::compound_search(&client, &request).await.map_err(server_error)
}

#[server]
pub async fn get_variant_sample_list(id: String) -> Result<VariantSampleList, ServerFnError> {
    let client = portal_client()?;
    backend::api::variant_sample_lists::get_variant_sample_list(&client, &id).await.map_err(server_error)
}

#[server]
pub async fn add_to_variant_sample_list(case: CaseSummary, selections: Vec<VariantSampleSelection>) -> Result<VariantSampleList, ServerFnError> {
    let client = portal_client()?;
    backend::api::variant_sample_lists::add_to_variant_sample_list(&client, &case, selections).await.map_err(server_error)
}

#[server]
pub async fn get_submission(submission_uuid: String) -> Result<IngestionSubmission, ServerFnError> {
    let client = portal_client()?;
    backend::api::ingestion::get_submission(&client, &submission_uuid).await.map_err(server_error)
}

#[server]
pub async fn get_poll_policy() -> Result<PollPolicy, ServerFnError> {
    backend::api::ingestion::configured_poll_policy().map_err(server_error)
}

#[server]
pub async fn list_access_keys(user_uuid: String) -> Result<Vec<AccessKey>, ServerFnError> {
    let client = portal_client()?;
    backend::api::access_keys::list_access_keys(&client, &user_uuid).await.map_err(server_error)
}

#[server]
pub async fn create_access_key() -> Result<AccessKeySecret, ServerFnError> {
    let client = portal_client()?;
    backend::api::access_keys::create_access_key(&client).await.map_err(server_error)
}

#[server]
pub async fn reset_access_key_secret(at_id: String) -> Result<AccessKeySecret, ServerFnError> {
    let client = portal_client()?;
    backend::api::access_keys::reset_access_key_secret(&client, &at_id).await.map_err(server_error)
}

#[server]
pub async fn delete_access_key(at_id: String) -> Result<(), ServerFnError> {
    let client = portal_client()?;
    backend::api::access_keys::delete_access_key(&client, &at_id).await.map_err(server_error)
}
