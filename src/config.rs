use std::net::SocketAddr;

use clap::Args;

pub const DEFAULT_DEPLOY_API_BASE: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_NOTIFY_API_BASE: &str = "https://discord.com/api";

/// Process-wide settings, loaded once at startup from flags or the environment.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Cloudflare account that owns the Pages project
    #[arg(long, env = "ACCOUNT_ID")]
    pub account_id: String,

    /// Pages project to redeploy
    #[arg(long, env = "PROJECT_NAME")]
    pub project_name: String,

    /// Email used for the X-Auth-Email header
    #[arg(long, env = "EMAIL")]
    pub email: String,

    /// API key used for the X-Auth-Key header
    #[arg(long, env = "AUTH_KEY", hide_env_values = true)]
    pub auth_key: String,

    /// Shared secret GitHub signs webhook deliveries with
    #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true)]
    pub webhook_secret: Option<String>,

    /// Discord webhook id, notifications are disabled without it
    #[arg(long, env = "DISCORD_WEBHOOK_ID")]
    pub discord_webhook_id: Option<String>,

    /// Discord webhook token, notifications are disabled without it
    #[arg(long, env = "DISCORD_WEBHOOK_TOKEN", hide_env_values = true)]
    pub discord_webhook_token: Option<String>,

    #[arg(long, env = "DEPLOY_API_BASE", default_value = DEFAULT_DEPLOY_API_BASE)]
    pub deploy_api_base: String,

    #[arg(long, env = "NOTIFY_API_BASE", default_value = DEFAULT_NOTIFY_API_BASE)]
    pub notify_api_base: String,
}

#[derive(Args, Debug, Clone)]
pub struct ServeOptions {
    /// Address the webhook listener binds to
    #[arg(long, env = "BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Seconds between scheduled redeploys, no in-process schedule when unset
    #[arg(long, env = "SCHEDULE_INTERVAL", value_parser = clap::value_parser!(u64).range(1..))]
    pub schedule_interval: Option<u64>,
}

impl Config {
    pub fn deployments_url(&self) -> String {
        format!(
            "{}/accounts/{}/pages/projects/{}/deployments",
            self.deploy_api_base.trim_end_matches('/'),
            self.account_id,
            self.project_name
        )
    }

    /// `None` unless both the webhook id and token are set.
    pub fn notify_url(&self) -> Option<String> {
        match (&self.discord_webhook_id, &self.discord_webhook_token) {
            (Some(id), Some(token)) => Some(format!(
                "{}/webhooks/{}/{}",
                self.notify_api_base.trim_end_matches('/'),
                id,
                token
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
pub fn test_config(base_url: &str) -> Config {
    Config {
        account_id: "abc".to_string(),
        project_name: "game-dev-diary".to_string(),
        email: "email@example.com".to_string(),
        auth_key: "iliketrains".to_string(),
        webhook_secret: Some("verysecret".to_string()),
        discord_webhook_id: Some("12345".to_string()),
        discord_webhook_token: Some("moresecret".to_string()),
        deploy_api_base: format!("{base_url}/client/v4"),
        notify_api_base: format!("{base_url}/api"),
    }
}
