/// Configuration management for snapgram-core
///
/// All remote endpoints, collection ids, and tuning knobs are loaded from
/// environment variables; the resulting `Config` is constructed explicitly
/// and passed into each gateway/service instead of living in process-wide
/// state.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote backend connection settings
    pub backend: BackendConfig,
    /// Document database and collection ids
    pub database: DatabaseConfig,
    /// Blob storage settings
    pub storage: StorageConfig,
    /// Image preview derivation settings
    pub preview: PreviewConfig,
    /// Feed pagination settings
    pub feed: FeedConfig,
}

/// Remote backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend API, without a trailing slash
    pub endpoint: String,
    /// Project identifier sent with every request
    pub project_id: String,
    /// Server-side API key; optional for session-scoped clients
    pub api_key: Option<String>,
}

/// Document database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database id containing the app collections
    pub database_id: String,
    /// Collection ids for the three app collections
    pub collections: Collections,
}

/// Collection ids for the three app collections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collections {
    pub users: String,
    pub posts: String,
    pub saves: String,
}

/// Blob storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket id holding post and avatar images
    pub bucket_id: String,
}

/// Crop anchor used when deriving image previews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gravity {
    Top,
    Center,
    Bottom,
    Left,
    Right,
}

impl Gravity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gravity::Top => "top",
            Gravity::Center => "center",
            Gravity::Bottom => "bottom",
            Gravity::Left => "left",
            Gravity::Right => "right",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "top" => Some(Gravity::Top),
            "center" => Some(Gravity::Center),
            "bottom" => Some(Gravity::Bottom),
            "left" => Some(Gravity::Left),
            "right" => Some(Gravity::Right),
            _ => None,
        }
    }
}

/// Image preview derivation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    pub width: u32,
    pub height: u32,
    pub gravity: Gravity,
    /// Output quality, 1-100
    pub quality: u8,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        PreviewConfig {
            width: 2000,
            height: 2000,
            gravity: Gravity::Top,
            quality: 100,
        }
    }
}

/// Feed pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Number of posts in the recent-posts feed
    pub recent_limit: u32,
    /// Page size for cursor-based feed pagination
    pub page_size: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            recent_limit: 20,
            page_size: 9,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let endpoint = std::env::var("SNAPGRAM_ENDPOINT")
            .unwrap_or_else(|_| "https://cloud.appwrite.io/v1".to_string())
            .trim_end_matches('/')
            .to_string();

        let project_id = std::env::var("SNAPGRAM_PROJECT_ID")
            .map_err(|_| "SNAPGRAM_PROJECT_ID must be set".to_string())?;
        if project_id.trim().is_empty() {
            return Err("SNAPGRAM_PROJECT_ID must not be empty".to_string());
        }

        let api_key = std::env::var("SNAPGRAM_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Config {
            backend: BackendConfig {
                endpoint,
                project_id,
                api_key,
            },
            database: DatabaseConfig {
                database_id: std::env::var("SNAPGRAM_DATABASE_ID")
                    .unwrap_or_else(|_| "snapgram".to_string()),
                collections: Collections {
                    users: std::env::var("SNAPGRAM_USERS_COLLECTION_ID")
                        .unwrap_or_else(|_| "users".to_string()),
                    posts: std::env::var("SNAPGRAM_POSTS_COLLECTION_ID")
                        .unwrap_or_else(|_| "posts".to_string()),
                    saves: std::env::var("SNAPGRAM_SAVES_COLLECTION_ID")
                        .unwrap_or_else(|_| "saves".to_string()),
                },
            },
            storage: StorageConfig {
                bucket_id: std::env::var("SNAPGRAM_BUCKET_ID")
                    .unwrap_or_else(|_| "media".to_string()),
            },
            preview: PreviewConfig {
                width: parse_env_or("SNAPGRAM_PREVIEW_WIDTH", 2000)?,
                height: parse_env_or("SNAPGRAM_PREVIEW_HEIGHT", 2000)?,
                gravity: match std::env::var("SNAPGRAM_PREVIEW_GRAVITY") {
                    Ok(raw) => Gravity::parse(&raw).ok_or_else(|| {
                        format!("SNAPGRAM_PREVIEW_GRAVITY='{}' is not a valid gravity", raw)
                    })?,
                    Err(_) => Gravity::Top,
                },
                quality: {
                    let quality: u8 = parse_env_or("SNAPGRAM_PREVIEW_QUALITY", 100)?;
                    if quality == 0 || quality > 100 {
                        return Err(format!(
                            "SNAPGRAM_PREVIEW_QUALITY must be within 1-100, got {}",
                            quality
                        ));
                    }
                    quality
                },
            },
            feed: FeedConfig {
                recent_limit: parse_env_or("SNAPGRAM_FEED_RECENT_LIMIT", 20)?,
                page_size: parse_env_or("SNAPGRAM_FEED_PAGE_SIZE", 9)?,
            },
        })
    }
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}
