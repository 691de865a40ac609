/// Data models for snapgram-core
///
/// Wire models mirror the remote store's document shapes (`$id`-style
/// metadata fields, camelCase attributes); input models are the plain
/// structured values the presentation layer hands to the workflow layer.
use chrono::{DateTime, Utc};
use mime::Mime;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// External identity record, owned by the account gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "$id")]
    pub id: String,
    pub email: String,
    pub name: String,
}

/// An authenticated session at the account gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// User profile document from the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "accountId")]
    pub account_id: String,
    pub name: String,
    #[serde(default)]
    pub username: String,
    pub email: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "imageId", default)]
    pub image_id: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "$updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Post document from the `posts` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "creator")]
    pub creator_id: String,
    pub caption: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "imageId")]
    pub image_id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "likes", default)]
    pub liker_ids: Vec<String>,
    #[serde(rename = "$createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "$updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Join document from the `saves` collection: one user saving one post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedPost {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "user")]
    pub user_id: String,
    #[serde(rename = "post")]
    pub post_id: String,
}

/// Metadata for a stored blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileHandle {
    #[serde(rename = "$id")]
    pub id: String,
    pub name: String,
}

/// One page of decoded documents from a listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Total number of matching documents, not just this page
    pub total: u64,
    pub items: Vec<T>,
}

/// An image to upload, as received from the presentation layer.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub name: String,
    pub content_type: Mime,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, content_type: Mime, bytes: Vec<u8>) -> Self {
        FileUpload {
            name: name.into(),
            content_type,
            bytes,
        }
    }
}

/// Input for [`crate::services::AccountService::create_user_account`].
#[derive(Debug, Clone, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "a valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
}

/// Input for [`crate::services::PostService::create_post`].
#[derive(Debug, Clone, Validate)]
pub struct NewPost {
    #[validate(length(min = 1, message = "creator id is required"))]
    pub creator_id: String,
    #[validate(length(min = 1, max = 2200, message = "caption is required"))]
    pub caption: String,
    pub location: String,
    /// Comma-separated tag list; parsed into an ordered, de-duplicated set
    pub tags: String,
    /// Exactly one image per post
    pub files: Vec<FileUpload>,
}

/// Input for [`crate::services::PostService::update_post`].
#[derive(Debug, Clone, Validate)]
pub struct UpdatePost {
    #[validate(length(min = 1, message = "post id is required"))]
    pub post_id: String,
    #[validate(length(min = 1, max = 2200, message = "caption is required"))]
    pub caption: String,
    pub location: String,
    pub tags: String,
    /// Current image reference, kept when no new file is supplied
    pub image_url: String,
    #[validate(length(min = 1, message = "image id is required"))]
    pub image_id: String,
    /// Empty to keep the current image; one file to replace it
    pub files: Vec<FileUpload>,
}

/// Input for [`crate::services::UserService::update_user`].
#[derive(Debug, Clone, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, message = "user id is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub bio: String,
    /// Current avatar reference, kept when no new file is supplied
    pub image_url: String,
    /// Absent when the current avatar is the generated-initials default
    pub image_id: Option<String>,
    /// Empty to keep the current avatar; one file to replace it
    pub files: Vec<FileUpload>,
}
