/// Release metadata, only used for log fields. Every field may be absent.
#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct GithubRelease {
    pub tag_name: Option<String>,
    pub name: Option<String>,
    pub html_url: Option<String>,
}
