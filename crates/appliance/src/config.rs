//! Connection configuration for the appliance and the image streamer

use serde::Deserialize;

fn default_api_version() -> u32 {
    200
}

fn default_image_streamer_api_version() -> u32 {
    300
}

/// Connection settings for the management appliance.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplianceConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_api_version")]
    pub api_version: u32,
    /// Hardware family this appliance manages (e.g. "Synergy", "C7000").
    #[serde(default)]
    pub variant: Option<String>,
}

/// Connection settings for the image-streamer appliance. Credentials fall
/// back to the management appliance's when unset.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageStreamerConfig {
    pub host: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_image_streamer_api_version")]
    pub api_version: u32,
}

/// Normalize a configured host into a base URL: add an https scheme when
/// none is given and strip any trailing slash.
pub fn base_url(host: &str) -> String {
    let with_scheme = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{host}")
    };
    with_scheme.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_version_defaults() {
        let config: ApplianceConfig = serde_json::from_value(json!({
            "host": "appliance.example.net",
            "username": "administrator",
            "password": "secret"
        }))
        .unwrap();
        assert_eq!(config.api_version, 200);
        assert!(config.variant.is_none());

        let streamer: ImageStreamerConfig = serde_json::from_value(json!({
            "host": "streamer.example.net"
        }))
        .unwrap();
        assert_eq!(streamer.api_version, 300);
        assert!(streamer.username.is_none());
    }

    #[test]
    fn test_base_url_normalization() {
        assert_eq!(base_url("appliance.example.net"), "https://appliance.example.net");
        assert_eq!(
            base_url("https://appliance.example.net/"),
            "https://appliance.example.net"
        );
        assert_eq!(base_url("http://10.0.0.2"), "http://10.0.0.2");
    }
}
