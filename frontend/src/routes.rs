use common::{page_titles::PageAction, selection::SelectionState};
use dioxus::prelude::*;
use serde_json::json;

use crate::components::navbar::Navbar;
use crate::data_definitions::url_param::UrlParam;
use crate::pages::access_keys_page::AccessKeysPage;
use crate::pages::filter_set_page::FilterSetPage;
use crate::pages::home_page::HomePage;
use crate::pages::submission_page::SubmissionPage;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Navbar)]


    #[route("/")]
    HomePage {},


    #[route("/case/:case_id/filter_set/:selection")]
    FilterSetPage {
        case_id: String,
        selection: UrlParam<SelectionState>,
    },


    #[route("/submission/:submission_uuid")]
    SubmissionPage { submission_uuid: String },


    #[route("/access_keys")]
    AccessKeysPage {},

}

impl Route {
    pub fn filter_set_page(case_id: String) -> Self {
        Self::FilterSetPage { case_id, selection: UrlParam::from(SelectionState::default()) }
    }

    /// Portal path of the document behind this page.
    pub fn context_href(&self) -> String {
        match self {
            Route::HomePage {} => "/".to_string(),
            Route::FilterSetPage { case_id, .. } => format!("/cases/{}/", case_id),
            Route::SubmissionPage { submission_uuid } => format!("/ingestion-submissions/{}/", submission_uuid),
            Route::AccessKeysPage {} => "/access-keys/".to_string(),
        }
    }

    /// Context for pages that are not backed by a portal item.
    pub fn local_context(&self) -> Option<serde_json::Value> {
        match self {
            Route::HomePage {} => Some(json!({ "@type": ["HomePage"], "title": "Home" })),
            Route::AccessKeysPage {} => Some(json!({ "@type": ["AccessKey", "Item"], "title": "Access Keys" })),
            _ => None,
        }
    }

    pub fn page_action(&self) -> PageAction {
        match self {
            Route::FilterSetPage { .. } => PageAction::Edit,
            _ => PageAction::View,
        }
    }
}
