use crate::config::ResolverSettings;
use crate::error::Result;
use crate::urls::usable_url;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The `config.json` document served alongside the page, editable without a
/// rebuild.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct RuntimeConfigDocument {
    #[serde(rename = "apiUrl", default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "apiUrl must be an absolute URL"))]
    pub api_url: Option<String>,
}

impl RuntimeConfigDocument {
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: Some(api_url.to_string()),
        }
    }

    /// Parses a document body. Unknown fields are ignored.
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// The configured URL, if the document actually configures one.
    ///
    /// Absent, blank, placeholder and malformed values all count as "not
    /// configured".
    pub fn configured_url(&self, settings: &ResolverSettings) -> Option<String> {
        let raw = self.api_url.as_deref()?.trim();
        if raw.is_empty() || settings.is_placeholder(raw) {
            return None;
        }
        let trimmed = Self::new(raw);
        if trimmed.validate().is_err() {
            return None;
        }
        usable_url(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"apiUrl": "https://quiz-api.railway.app"}"#, Some("https://quiz-api.railway.app"))]
    #[case(r#"{"apiUrl": "  https://quiz-api.railway.app/ "}"#, Some("https://quiz-api.railway.app"))]
    #[case(r#"{"apiUrl": "https://quiz-api.railway.app", "env": "prod"}"#, Some("https://quiz-api.railway.app"))]
    #[case(r#"{"apiUrl": ""}"#, None)]
    #[case(r#"{"apiUrl": "   "}"#, None)]
    #[case(r#"{}"#, None)]
    #[case(r#"{"apiUrl": "https://your-backend-url.railway.app"}"#, None)]
    #[case(r#"{"apiUrl": "not a url"}"#, None)]
    fn configured_url(#[case] body: &str, #[case] expected: Option<&str>) {
        let settings = ResolverSettings::default();
        let doc = RuntimeConfigDocument::from_json(body).unwrap();
        assert_eq!(doc.configured_url(&settings).as_deref(), expected);
    }

    #[test]
    fn invalid_body_is_an_error() {
        assert!(RuntimeConfigDocument::from_json("<html>").is_err());
        assert!(RuntimeConfigDocument::from_json(r#"{"apiUrl": 42}"#).is_err());
    }

    #[test]
    fn serializes_with_camel_case_field() {
        let json = serde_json::to_value(RuntimeConfigDocument::new("https://a.example.com")).unwrap();
        assert_eq!(json, serde_json::json!({ "apiUrl": "https://a.example.com" }));
    }
}
