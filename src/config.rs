use std::env;

use url::Url;

/// Backend connection settings, resolved once at startup. There is no
/// runtime override path.
#[derive(Clone)]
pub struct Config {
    pub api_base_url: String,
}

impl Config {
    /// Reads `API_BASE_URL` from the environment (usually populated from
    /// `.env`). The value must be an absolute URL; a trailing slash is
    /// stripped so endpoint paths can be appended uniformly.
    pub fn from_env() -> Self {
        let raw = env::var("API_BASE_URL").expect("API_BASE_URL not set in .env");
        let url = Url::parse(&raw).expect("API_BASE_URL is not a valid URL");
        Self {
            api_base_url: url.as_str().trim_end_matches('/').to_string(),
        }
    }
}
