//! Which title view a page shows, keyed by item type and page action.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PageAction {
    View,
    Edit,
    Create,
    Add,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TitleView {
    Generic,
    Home,
    CaseTitle,
    FilterSetTitle,
    FilterSetEditTitle,
    SubmissionTitle,
    SubmissionCreateTitle,
    SearchTitle,
    UserTitle,
    AccessKeysTitle,
}

fn context_str<'a>(context: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    context.get(key).and_then(|v| v.as_str()).filter(|v| !v.is_empty())
}

impl TitleView {
    /// Heading text for a page showing `context`.
    pub fn text(&self, context: &serde_json::Value) -> String {
        let name = context_str(context, "display_title")
            .or_else(|| context_str(context, "title"))
            .or_else(|| context_str(context, "accession"))
            .or_else(|| context_str(context, "uuid"))
            .unwrap_or("");
        let text = match self {
            TitleView::Generic if name.is_empty() => "Portal".to_string(),
            TitleView::Generic => name.to_string(),
            TitleView::Home => "Home".to_string(),
            TitleView::CaseTitle => format!("Case {}", name),
            TitleView::FilterSetTitle => format!("FilterSet {}", name),
            TitleView::FilterSetEditTitle => format!("Editing FilterSet {}", name),
            TitleView::SubmissionTitle => format!("Submission {}", name),
            TitleView::SubmissionCreateTitle => "New Submission".to_string(),
            TitleView::SearchTitle => "Search".to_string(),
            TitleView::UserTitle => format!("User {}", name),
            TitleView::AccessKeysTitle => "Access Keys".to_string(),
        };
        text.trim().to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PageTitleRegistry {
    views: BTreeMap<(String, PageAction), TitleView>,
}

impl PageTitleRegistry {
    pub fn register(&mut self, item_type: &str, action: PageAction, view: TitleView) -> &mut Self {
        self.views.insert((item_type.to_string(), action), view);
        self
    }

    pub fn standard() -> Self {
        let mut registry = Self::default();
        registry
            .register("HomePage", PageAction::View, TitleView::Home)
            .register("Case", PageAction::View, TitleView::CaseTitle)
            .register("FilterSet", PageAction::View, TitleView::FilterSetTitle)
            .register("FilterSet", PageAction::Edit, TitleView::FilterSetEditTitle)
            .register("IngestionSubmission", PageAction::View, TitleView::SubmissionTitle)
            .register("IngestionSubmission", PageAction::Create, TitleView::SubmissionCreateTitle)
            .register("User", PageAction::View, TitleView::UserTitle)
            .register("AccessKey", PageAction::View, TitleView::AccessKeysTitle)
            .register("Search", PageAction::View, TitleView::SearchTitle)
            .register("Item", PageAction::Search, TitleView::SearchTitle);
        registry
    }

    /// `types` is the item's `@type` list, most specific first. For each type
    /// the exact action is tried, then `View` unless the action is `Create`.
    pub fn resolve<S: AsRef<str>>(&self, types: &[S], action: PageAction) -> TitleView {
        for item_type in types {
            let item_type = item_type.as_ref().to_string();
            if let Some(view) = self.views.get(&(item_type.clone(), action)) {
                return *view;
            }
            if action != PageAction::Create {
                if let Some(view) = self.views.get(&(item_type, PageAction::View)) {
                    return *view;
                }
            }
        }
        TitleView::Generic
    }
}

pub static PAGE_TITLES: Lazy<PageTitleRegistry> = Lazy::new(PageTitleRegistry::standard);

/// `@type` list of a context document.
pub fn context_types(context: &serde_json::Value) -> Vec<String> {
    context
        .get("@type")
        .and_then(|t| t.as_array())
        .map(|types| types.iter().filter_map(|t| t.as_str().map(|s| s.to_string())).collect())
        .unwrap_or_default()
}
