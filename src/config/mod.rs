//! Configuration handling for the scraper and drafting binaries.
//!
//! Everything is read from the process environment. Binaries call
//! `dotenvy::dotenv()` first so a local `.env` file works the same way.
//! Missing variables fall back to development defaults; malformed numeric or
//! boolean values are reported as a `ConfigError`.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Environment variable names.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_SSLMODE: &str = "DB_SSLMODE";
pub const ENV_SEARCH_URL: &str = "SEARCH_URL";
pub const ENV_SITE_BASE_URL: &str = "SITE_BASE_URL";
pub const ENV_SEARCH_TEXT: &str = "SEARCH_TEXT";
pub const ENV_BLOCKED_EMAIL_DOMAINS: &str = "BLOCKED_EMAIL_DOMAINS";
pub const ENV_RECENT_ONLY: &str = "RECENT_ONLY";
pub const ENV_STORE_PAUSE_MS: &str = "STORE_PAUSE_MS";
pub const ENV_MAX_DRAFTS: &str = "MAX_DRAFTS";
pub const ENV_DRAFT_CC_EMAIL: &str = "DRAFT_CC_EMAIL";
pub const ENV_GMAIL_ACCESS_TOKEN: &str = "GMAIL_ACCESS_TOKEN";
pub const ENV_GMAIL_API_BASE: &str = "GMAIL_API_BASE";
pub const ENV_APPLICANT_NAME: &str = "APPLICANT_NAME";
pub const ENV_APPLICANT_EMAIL: &str = "APPLICANT_EMAIL";
pub const ENV_APPLICANT_PHONE: &str = "APPLICANT_PHONE";
pub const ENV_TARGET_ROLE: &str = "TARGET_ROLE";
pub const ENV_APPLICANT_VISA: &str = "APPLICANT_VISA";
pub const ENV_APPLICANT_LOCATION: &str = "APPLICANT_LOCATION";

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_NAME: &str = "postgres";
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_SSLMODE: &str = "require";
const DEFAULT_SEARCH_URL: &str = "https://nvoids.com/search_sph.jsp";
const DEFAULT_SITE_BASE_URL: &str = "https://nvoids.com/";
const DEFAULT_SEARCH_TEXT: &str = "java full stack developer";
const DEFAULT_BLOCKED_EMAIL_DOMAINS: &str = "nvoids.com,jobs.nvoids.com";
const DEFAULT_STORE_PAUSE_MS: u64 = 2000;
const DEFAULT_MAX_DRAFTS: i64 = 10;
const DEFAULT_GMAIL_API_BASE: &str = "https://gmail.googleapis.com";
const DEFAULT_TARGET_ROLE: &str = "Java Full Stack Developer";
const DEFAULT_APPLICANT_VISA: &str = "H1B";
const DEFAULT_APPLICANT_LOCATION: &str = "Local";

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Full connection URL. When set it wins over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub ssl_mode: String,
}

/// Settings for one scrape run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    pub search_url: String,
    pub site_base_url: String,
    pub search_text: String,
    /// Domains owned by the job board itself; addresses under them are dropped.
    pub blocked_email_domains: Vec<String>,
    pub recent_only: bool,
    pub store_pause: Duration,
}

/// Applicant details rendered into outreach drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub target_role: String,
    pub visa: String,
    pub location: String,
}

/// Settings for one drafting run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftConfig {
    pub max_drafts: i64,
    pub cc_email: Option<String>,
    pub gmail_access_token: Option<String>,
    pub gmail_api_base: String,
    pub profile: ApplicantProfile,
}

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseConfig,
    pub scrape: ScrapeConfig,
    pub draft: DraftConfig,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database = DatabaseConfig {
            url: optional(ENV_DATABASE_URL),
            host: string_or(ENV_DB_HOST, DEFAULT_DB_HOST),
            port: parsed_or(ENV_DB_PORT, DEFAULT_DB_PORT)?,
            name: string_or(ENV_DB_NAME, DEFAULT_DB_NAME),
            user: string_or(ENV_DB_USER, DEFAULT_DB_USER),
            password: string_or(ENV_DB_PASSWORD, ""),
            ssl_mode: string_or(ENV_DB_SSLMODE, DEFAULT_DB_SSLMODE),
        };

        let scrape = ScrapeConfig {
            search_url: string_or(ENV_SEARCH_URL, DEFAULT_SEARCH_URL),
            site_base_url: string_or(ENV_SITE_BASE_URL, DEFAULT_SITE_BASE_URL),
            search_text: string_or(ENV_SEARCH_TEXT, DEFAULT_SEARCH_TEXT),
            blocked_email_domains: split_list(&string_or(
                ENV_BLOCKED_EMAIL_DOMAINS,
                DEFAULT_BLOCKED_EMAIL_DOMAINS,
            )),
            recent_only: bool_or(ENV_RECENT_ONLY, false)?,
            store_pause: Duration::from_millis(parsed_or(
                ENV_STORE_PAUSE_MS,
                DEFAULT_STORE_PAUSE_MS,
            )?),
        };

        let max_drafts: i64 = parsed_or(ENV_MAX_DRAFTS, DEFAULT_MAX_DRAFTS)?;
        if max_drafts <= 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_MAX_DRAFTS,
                reason: "must be a positive integer".to_string(),
            });
        }

        let draft = DraftConfig {
            max_drafts,
            cc_email: optional(ENV_DRAFT_CC_EMAIL),
            gmail_access_token: optional(ENV_GMAIL_ACCESS_TOKEN),
            gmail_api_base: string_or(ENV_GMAIL_API_BASE, DEFAULT_GMAIL_API_BASE),
            profile: ApplicantProfile {
                name: string_or(ENV_APPLICANT_NAME, ""),
                email: string_or(ENV_APPLICANT_EMAIL, ""),
                phone: string_or(ENV_APPLICANT_PHONE, ""),
                target_role: string_or(ENV_TARGET_ROLE, DEFAULT_TARGET_ROLE),
                visa: string_or(ENV_APPLICANT_VISA, DEFAULT_APPLICANT_VISA),
                location: string_or(ENV_APPLICANT_LOCATION, DEFAULT_APPLICANT_LOCATION),
            },
        };

        Ok(Self {
            database,
            scrape,
            draft,
        })
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            site_base_url: DEFAULT_SITE_BASE_URL.to_string(),
            search_text: DEFAULT_SEARCH_TEXT.to_string(),
            blocked_email_domains: split_list(DEFAULT_BLOCKED_EMAIL_DOMAINS),
            recent_only: false,
            store_pause: Duration::from_millis(DEFAULT_STORE_PAUSE_MS),
        }
    }
}

impl Default for ApplicantProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            target_role: DEFAULT_TARGET_ROLE.to_string(),
            visa: DEFAULT_APPLICANT_VISA.to_string(),
            location: DEFAULT_APPLICANT_LOCATION.to_string(),
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn string_or(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

fn parsed_or<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: Display,
{
    match optional(key) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field: key,
            reason: format!("'{raw}': {e}"),
        }),
        None => Ok(default),
    }
}

fn bool_or(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match optional(key).map(|v| v.to_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                field: key,
                reason: format!("'{v}' is not a boolean"),
            }),
        },
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('@').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Ensure environment-variable manipulating tests run serially.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ALL_KEYS: [&str; 23] = [
        ENV_DATABASE_URL,
        ENV_DB_HOST,
        ENV_DB_PORT,
        ENV_DB_NAME,
        ENV_DB_USER,
        ENV_DB_PASSWORD,
        ENV_DB_SSLMODE,
        ENV_SEARCH_URL,
        ENV_SITE_BASE_URL,
        ENV_SEARCH_TEXT,
        ENV_BLOCKED_EMAIL_DOMAINS,
        ENV_RECENT_ONLY,
        ENV_STORE_PAUSE_MS,
        ENV_MAX_DRAFTS,
        ENV_DRAFT_CC_EMAIL,
        ENV_GMAIL_ACCESS_TOKEN,
        ENV_GMAIL_API_BASE,
        ENV_APPLICANT_NAME,
        ENV_APPLICANT_EMAIL,
        ENV_APPLICANT_PHONE,
        ENV_TARGET_ROLE,
        ENV_APPLICANT_VISA,
        ENV_APPLICANT_LOCATION,
    ];

    fn clear_env() {
        for key in ALL_KEYS {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn defaults_when_env_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.database.url, None);
        assert_eq!(cfg.database.port, 5432);
        assert_eq!(cfg.database.ssl_mode, "require");
        assert_eq!(cfg.scrape, ScrapeConfig::default());
        assert_eq!(
            cfg.scrape.blocked_email_domains,
            vec!["nvoids.com".to_string(), "jobs.nvoids.com".to_string()]
        );
        assert!(!cfg.scrape.recent_only);
        assert_eq!(cfg.scrape.store_pause, Duration::from_secs(2));
        assert_eq!(cfg.draft.max_drafts, 10);
        assert_eq!(cfg.draft.cc_email, None);
        assert_eq!(cfg.draft.profile, ApplicantProfile::default());
    }

    #[test]
    fn overrides_when_env_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_DATABASE_URL, "postgres://user:pw@db:5432/jobs");
            env::set_var(ENV_DB_PORT, "6543");
            env::set_var(ENV_SEARCH_TEXT, "spring boot");
            env::set_var(ENV_BLOCKED_EMAIL_DOMAINS, "@board.io, Mail.Board.io ,");
            env::set_var(ENV_RECENT_ONLY, "yes");
            env::set_var(ENV_STORE_PAUSE_MS, "0");
            env::set_var(ENV_MAX_DRAFTS, "25");
            env::set_var(ENV_DRAFT_CC_EMAIL, "cc@example.com");
        }
        let cfg = Config::from_env().unwrap();
        assert_eq!(
            cfg.database.url.as_deref(),
            Some("postgres://user:pw@db:5432/jobs")
        );
        assert_eq!(cfg.database.port, 6543);
        assert_eq!(cfg.scrape.search_text, "spring boot");
        assert_eq!(
            cfg.scrape.blocked_email_domains,
            vec!["board.io".to_string(), "mail.board.io".to_string()]
        );
        assert!(cfg.scrape.recent_only);
        assert_eq!(cfg.scrape.store_pause, Duration::ZERO);
        assert_eq!(cfg.draft.max_drafts, 25);
        assert_eq!(cfg.draft.cc_email.as_deref(), Some("cc@example.com"));
        clear_env();
    }

    #[test]
    fn rejects_malformed_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_DB_PORT, "not-a-port");
        }
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_DB_PORT));

        clear_env();
        unsafe {
            env::set_var(ENV_RECENT_ONLY, "maybe");
        }
        assert!(Config::from_env().is_err());

        clear_env();
        unsafe {
            env::set_var(ENV_MAX_DRAFTS, "0");
        }
        assert!(Config::from_env().is_err());
        clear_env();
    }
}
