mod github_release;
mod payload;

pub use github_release::GithubRelease;
pub use payload::GithubReleaseWebhookPayload;
