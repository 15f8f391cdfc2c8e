//! Reads the JSON payloads a server-rendered page embeds in
//! `<script type="application/json" data-prop-name="...">` tags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{alerts::Alert, app_state::SessionUser};

const SCRIPT_OPEN: &str = "<script";
const SCRIPT_CLOSE: &str = "</script>";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InitialPayload {
    pub href: Option<String>,
    pub context: Option<serde_json::Value>,
    pub user_details: Option<SessionUser>,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Error)]
pub enum HydrationError {
    #[error("Invalid JSON in '{prop}' payload: {source}")]
    InvalidJson { prop: String, source: serde_json::Error },
}

/// Value of the attribute called exactly `name`. The name must follow
/// whitespace so `type` does not match inside `data-prop-type`.
fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{}=\"", name);
    let (at, _) = tag
        .match_indices(&needle)
        .find(|(at, _)| tag[..*at].chars().next_back().is_some_and(char::is_whitespace))?;
    let start = at + needle.len();
    let end = tag[start..].find('"')? + start;
    Some(&tag[start..end])
}

/// Map of `data-prop-name` to raw script body for every JSON script tag.
pub fn extract_script_props(html: &str) -> BTreeMap<String, String> {
    let mut props = BTreeMap::new();
    let mut i = 0;
    while let Some(open) = html[i..].find(SCRIPT_OPEN).map(|p| p + i) {
        let Some(tag_end) = html[open..].find('>').map(|p| p + open) else {
            break;
        };
        let tag = &html[open..tag_end];
        let body_start = tag_end + 1;
        let Some(close) = html[body_start..].find(SCRIPT_CLOSE).map(|p| p + body_start) else {
            break;
        };
        if attribute(tag, "type") == Some("application/json") {
            if let Some(name) = attribute(tag, "data-prop-name") {
                props.insert(name.to_string(), html[body_start..close].trim().to_string());
            }
        }
        i = close + SCRIPT_CLOSE.len();
    }
    props
}

impl InitialPayload {
    /// Unknown props are ignored; a known prop with malformed JSON is an error.
    pub fn from_html(html: &str) -> Result<Self, HydrationError> {
        let props = extract_script_props(html);
        let mut payload = InitialPayload::default();
        for (prop, body) in &props {
            let invalid = |source| HydrationError::InvalidJson { prop: prop.clone(), source };
            match prop.as_str() {
                "href" => payload.href = serde_json::from_str(body).map_err(invalid)?,
                "context" => payload.context = Some(serde_json::from_str(body).map_err(invalid)?),
                "user_details" => payload.user_details = serde_json::from_str(body).map_err(invalid)?,
                "alerts" => payload.alerts = serde_json::from_str(body).map_err(invalid)?,
                _ => {}
            }
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
        <script>var x = "<script>";</script>
        <script data-prop-name="context" type="application/json">{"@id": "/cases/GAPCA1/", "title": "a <\/script> b"}</script>
        <script type="application/json" data-prop-name="user_details">{"email": "curator@example.org", "first_name": "Ada", "last_name": "L"}</script>
        <script type="application/json" data-prop-name="alerts">[{"title": "Welcome", "message": ["hi"], "style": "info"}]</script>
        <script type="application/json" data-prop-name="lastBuildTime">123</script>
    </head></html>"#;

    #[test]
    fn reads_known_props() {
        let payload = InitialPayload::from_html(PAGE).unwrap();
        let context = payload.context.unwrap();
        assert_eq!(context["@id"], "/cases/GAPCA1/");
        assert_eq!(context["title"], "a </script> b");
        assert_eq!(payload.user_details.unwrap().display_name(), "Ada L");
        assert_eq!(payload.alerts[0].title, "Welcome");
        assert!(payload.href.is_none());
    }

    #[test]
    fn plain_scripts_are_skipped() {
        let props = extract_script_props(PAGE);
        assert_eq!(props.len(), 4);
        assert!(props.contains_key("lastBuildTime"));
    }

    #[test]
    fn attribute_names_match_whole_words() {
        let html = r#"<script data-prop-type="application/json" data-prop-name="href">"/a/"</script>
            <script data-prop-type="x" type="application/json" data-prop-name="context">{}</script>"#;
        let props = extract_script_props(html);
        assert_eq!(props.len(), 1);
        assert!(props.contains_key("context"));
        assert_eq!(attribute(r#"<script data-prop-type="x" type="y""#, "type"), Some("y"));
    }

    #[test]
    fn malformed_payload_names_the_prop() {
        let html = r#"<script type="application/json" data-prop-name="alerts">[{</script>"#;
        let error = InitialPayload::from_html(html).unwrap_err();
        assert!(error.to_string().contains("'alerts'"));
    }
}
