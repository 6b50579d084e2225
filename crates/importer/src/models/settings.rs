use serde::{Deserialize, Serialize};

/// Application settings stored in TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Import and refresh behaviour
    #[serde(default)]
    pub import: ImportSettings,
    /// Outbound HTTP configuration
    #[serde(default)]
    pub http: HttpSettings,
    /// Admin panel links used in notifications
    #[serde(default)]
    pub admin: AdminSettings,
}

impl Settings {
    /// Locales must be present and non-blank; interval and timeout must be positive.
    pub fn validate(&self) -> Result<(), String> {
        if self.import.locales.is_empty() {
            return Err("import.locales must name at least one locale".to_string());
        }
        if self.import.locales.iter().any(|l| l.trim().is_empty()) {
            return Err("import.locales must not contain blank entries".to_string());
        }
        if self.import.refresh_interval_secs == 0 {
            return Err("import.refresh_interval_secs must be positive".to_string());
        }
        if self.http.timeout_secs == 0 {
            return Err("http.timeout_secs must be positive".to_string());
        }
        Ok(())
    }
}

/// Import configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSettings {
    /// Locales every localized field is written to
    #[serde(default = "ImportSettings::default_locales")]
    pub locales: Vec<String>,
    /// Seconds between scheduled refreshes of all imported posts
    #[serde(default = "ImportSettings::default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Posts refreshed in parallel during a bulk refresh
    #[serde(default = "ImportSettings::default_refresh_concurrency")]
    pub refresh_concurrency: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            locales: Self::default_locales(),
            refresh_interval_secs: Self::default_refresh_interval_secs(),
            refresh_concurrency: Self::default_refresh_concurrency(),
        }
    }
}

impl ImportSettings {
    fn default_locales() -> Vec<String> {
        vec!["en".to_string(), "ar".to_string()]
    }

    fn default_refresh_interval_secs() -> u64 {
        86400
    }

    fn default_refresh_concurrency() -> usize {
        5
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Per-request timeout; a timed out fetch counts as missing data
    #[serde(default = "HttpSettings::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "HttpSettings::default_user_agent")]
    pub user_agent: String,
    #[serde(default = "HttpSettings::default_github_api_url")]
    pub github_api_url: String,
    #[serde(default = "HttpSettings::default_github_raw_url")]
    pub github_raw_url: String,
    #[serde(default = "HttpSettings::default_packagist_url")]
    pub packagist_url: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout_secs(),
            user_agent: Self::default_user_agent(),
            github_api_url: Self::default_github_api_url(),
            github_raw_url: Self::default_github_raw_url(),
            packagist_url: Self::default_packagist_url(),
        }
    }
}

impl HttpSettings {
    fn default_timeout_secs() -> u64 {
        10
    }

    fn default_user_agent() -> String {
        "cms-github-importer".to_string()
    }

    fn default_github_api_url() -> String {
        "https://api.github.com".to_string()
    }

    fn default_github_raw_url() -> String {
        "https://raw.githubusercontent.com".to_string()
    }

    fn default_packagist_url() -> String {
        "https://packagist.org".to_string()
    }
}

/// Admin panel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminSettings {
    /// Base URL of the admin panel (e.g., http://localhost:8000/admin)
    #[serde(default = "AdminSettings::default_url")]
    pub url: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
        }
    }
}

impl AdminSettings {
    fn default_url() -> String {
        "http://localhost:8000/admin".to_string()
    }

    /// Edit page of a post
    pub fn post_url(&self, post_id: i64) -> String {
        format!("{}/posts/{}/edit", self.url.trim_end_matches('/'), post_id)
    }
}
