/// User profile workflows: directory reads and profile editing
use std::sync::Arc;

use serde_json::json;

use crate::config::{Collections, PreviewConfig};
use crate::error::{AppError, Result};
use crate::gateways::{decode, DocumentStore, FileStore};
use crate::models::{Page, UpdateUser, UserProfile};
use crate::query::Query;
use crate::services::{cleanup_file, decode_page, stage_upload};
use crate::validators;

pub struct UserService {
    documents: Arc<dyn DocumentStore>,
    files: Arc<dyn FileStore>,
    collections: Collections,
    preview: PreviewConfig,
}

impl UserService {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        files: Arc<dyn FileStore>,
        collections: Collections,
        preview: PreviewConfig,
    ) -> Self {
        UserService {
            documents,
            files,
            collections,
            preview,
        }
    }

    /// Newest profiles first, optionally capped.
    pub async fn get_users(&self, limit: Option<u32>) -> Result<Page<UserProfile>> {
        let mut queries = vec![Query::order_desc("$createdAt")];
        if let Some(limit) = limit {
            queries.push(Query::limit(limit));
        }

        let list = self.documents.list(&self.collections.users, &queries).await?;
        decode_page(&self.collections.users, list)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<UserProfile> {
        let document = self.documents.get(&self.collections.users, user_id).await?;
        decode(&self.collections.users, document)
    }

    /// Edit a profile, optionally replacing the avatar image.
    ///
    /// Same image-replacement protocol as post updates: a new avatar is
    /// staged first, the old file is deleted only after the profile update
    /// committed the new reference, and a failed update deletes only the
    /// staged file. Profiles whose avatar is the generated-initials
    /// default have no stored file, so there is nothing old to delete.
    pub async fn update_user(&self, input: UpdateUser) -> Result<UserProfile> {
        validators::check(&input)?;

        let UpdateUser {
            user_id,
            name,
            bio,
            image_url,
            image_id,
            files,
        } = input;

        let staged = match files.into_iter().next() {
            Some(file) => Some(stage_upload(&self.files, &self.preview, file).await?),
            None => None,
        };

        let (new_url, new_id) = match &staged {
            Some(staged) => (staged.url.clone(), Some(staged.handle.id.clone())),
            None => (image_url, image_id.clone()),
        };

        let data = json!({
            "name": name,
            "bio": bio,
            "imageUrl": new_url,
            "imageId": new_id,
        });

        let document = match self
            .documents
            .update(&self.collections.users, &user_id, data)
            .await
        {
            Ok(document) => document,
            Err(err) => {
                if let Some(staged) = &staged {
                    cleanup_file(&self.files, &staged.handle.id, "staged replacement avatar")
                        .await;
                }
                return Err(AppError::ProfilePersistence(err.to_string()));
            }
        };

        if staged.is_some() {
            if let Some(old_id) = &image_id {
                cleanup_file(&self.files, old_id, "replaced avatar").await;
            }
        }

        decode(&self.collections.users, document)
    }
}
