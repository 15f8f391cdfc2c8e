//! The parts of a Case document the FilterSet workbench needs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CaseSummary {
    #[serde(rename = "@id")]
    pub at_id: String,
    pub accession: String,
    pub display_title: String,
    pub project: Option<String>,
    /// `@id` or uuid of the FilterSet currently used for this case.
    pub active_filterset: Option<String>,
    pub variant_sample_list_id: Option<String>,
    /// Flag queries the server adds to every search for this case, such as
    /// restricting results to the case's samples.
    pub initial_search_href_filter_addon: Option<String>,
}
