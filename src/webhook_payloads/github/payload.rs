use serde_json::Value;

use super::GithubRelease;

pub const PUBLISHED_ACTION: &str = "published";

/// The part of a GitHub `release` delivery this service reads. Anything that
/// is not in the expected shape is treated as absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GithubReleaseWebhookPayload {
    pub action: Option<String>,
    pub release: Option<GithubRelease>,
}

impl GithubReleaseWebhookPayload {
    /// Fails only when the body is not JSON at all.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        Ok(Self::from(value))
    }

    pub fn is_published(&self) -> bool {
        self.action.as_deref() == Some(PUBLISHED_ACTION)
    }
}

impl From<Value> for GithubReleaseWebhookPayload {
    fn from(value: Value) -> Self {
        Self {
            action: value
                .get("action")
                .and_then(Value::as_str)
                .map(str::to_string),
            release: value
                .get("release")
                .cloned()
                .and_then(|release| serde_json::from_value(release).ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> GithubReleaseWebhookPayload {
        GithubReleaseWebhookPayload::from_slice(body.as_bytes()).unwrap()
    }

    #[test]
    fn minimal_payload() {
        let payload = parse(r#"{"action":"published"}"#);

        assert!(payload.is_published());
        assert_eq!(payload.release, None);
    }

    #[test]
    fn reads_release_from_full_delivery() {
        let payload = parse(
            r#"{
                "action": "released",
                "release": {
                    "id": 1,
                    "tag_name": "v1.2.0",
                    "name": "Spring update",
                    "html_url": "https://github.com/octo/diary/releases/tag/v1.2.0",
                    "draft": false
                },
                "repository": { "full_name": "octo/diary" }
            }"#,
        );

        assert!(!payload.is_published());
        let release = payload.release.unwrap();
        assert_eq!(release.tag_name.as_deref(), Some("v1.2.0"));
        assert_eq!(release.name.as_deref(), Some("Spring update"));
    }

    #[test]
    fn release_without_tag_name_is_still_published() {
        let payload = parse(r#"{"action":"published","release":{"name":"v1"}}"#);

        assert!(payload.is_published());
        assert_eq!(payload.release.unwrap().tag_name, None);
    }

    #[test]
    fn malformed_release_object_is_dropped() {
        let payload = parse(r#"{"action":"published","release":"v1"}"#);

        assert!(payload.is_published());
        assert_eq!(payload.release, None);
    }

    #[test]
    fn non_string_action_is_not_published() {
        assert!(!parse(r#"{"action":7}"#).is_published());
        assert!(!parse(r#"{"action":null}"#).is_published());
        assert!(!parse(r#"{"action":["published"]}"#).is_published());
    }

    #[test]
    fn missing_action_is_not_published() {
        assert!(!parse("{}").is_published());
        assert!(!parse("[]").is_published());
        assert!(!parse(r#""published""#).is_published());
    }

    #[test]
    fn non_json_body_is_an_error() {
        assert!(GithubReleaseWebhookPayload::from_slice(b"not json").is_err());
        assert!(GithubReleaseWebhookPayload::from_slice(b"").is_err());
    }
}
