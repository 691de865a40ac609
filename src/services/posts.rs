/// Post workflows: creation, update, deletion with file-attachment
/// lifecycle management, likes, saves, and the read-side feeds.
///
/// Writes are ordered so that a document never references a file that is
/// not in storage: uploads happen first, and an upload whose follow-up
/// step fails is deleted again before the error surfaces.
use std::sync::Arc;

use serde_json::json;

use crate::config::{Collections, FeedConfig, PreviewConfig};
use crate::error::{AppError, Result};
use crate::gateways::{decode, DocumentStore, FileStore};
use crate::models::{NewPost, Page, Post, SavedPost, UpdatePost};
use crate::query::Query;
use crate::services::{cleanup_file, decode_page, new_document_id, stage_upload};
use crate::validators::{self, parse_tags};

pub struct PostService {
    documents: Arc<dyn DocumentStore>,
    files: Arc<dyn FileStore>,
    collections: Collections,
    preview: PreviewConfig,
    feed: FeedConfig,
}

impl PostService {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        files: Arc<dyn FileStore>,
        collections: Collections,
        preview: PreviewConfig,
        feed: FeedConfig,
    ) -> Self {
        PostService {
            documents,
            files,
            collections,
            preview,
            feed,
        }
    }

    /// Create a post with its image, all-or-nothing.
    ///
    /// Upload precedes preview derivation precedes the document write; if
    /// either later step fails, the upload is deleted before the error
    /// surfaces, so no orphaned blob and no dangling reference survive.
    pub async fn create_post(&self, input: NewPost) -> Result<Post> {
        validators::check(&input)?;

        let NewPost {
            creator_id,
            caption,
            location,
            tags,
            mut files,
        } = input;

        if files.len() != 1 {
            return Err(AppError::validation(
                "files",
                "exactly one image is required",
            ));
        }

        let staged = stage_upload(&self.files, &self.preview, files.remove(0)).await?;
        let tags = parse_tags(&tags);

        let data = json!({
            "creator": creator_id,
            "caption": caption,
            "imageUrl": staged.url,
            "imageId": staged.handle.id,
            "location": location,
            "tags": tags,
        });

        let document = match self
            .documents
            .create(&self.collections.posts, &new_document_id(), data)
            .await
        {
            Ok(document) => document,
            Err(err) => {
                cleanup_file(&self.files, &staged.handle.id, "orphaned upload").await;
                return Err(AppError::PostPersistence(err.to_string()));
            }
        };

        decode(&self.collections.posts, document)
    }

    /// Update a post, optionally replacing its image.
    ///
    /// A new image is staged with the same compensation protocol as
    /// creation; the old file is deleted only after the document update
    /// committed the new reference, so there is no window in which the
    /// post references a deleted file. If the update fails, only the
    /// staged new file is deleted and the post keeps its original image.
    pub async fn update_post(&self, input: UpdatePost) -> Result<Post> {
        validators::check(&input)?;

        let UpdatePost {
            post_id,
            caption,
            location,
            tags,
            image_url,
            image_id,
            files,
        } = input;

        let staged = match files.into_iter().next() {
            Some(file) => Some(stage_upload(&self.files, &self.preview, file).await?),
            None => None,
        };

        let (new_url, new_id) = match &staged {
            Some(staged) => (staged.url.clone(), staged.handle.id.clone()),
            None => (image_url, image_id.clone()),
        };

        let tags = parse_tags(&tags);
        let data = json!({
            "caption": caption,
            "imageUrl": new_url,
            "imageId": new_id,
            "location": location,
            "tags": tags,
        });

        let document = match self
            .documents
            .update(&self.collections.posts, &post_id, data)
            .await
        {
            Ok(document) => document,
            Err(err) => {
                if let Some(staged) = &staged {
                    // The post still references the old, valid image.
                    cleanup_file(&self.files, &staged.handle.id, "staged replacement image").await;
                }
                return Err(AppError::PostPersistence(err.to_string()));
            }
        };

        if staged.is_some() {
            cleanup_file(&self.files, &image_id, "replaced image").await;
        }

        decode(&self.collections.posts, document)
    }

    /// Delete a post and its image.
    ///
    /// The document goes first; if that fails the file is left untouched,
    /// since a live document may still reference it. A file-deletion
    /// failure afterwards leaves an orphaned blob, which is logged and
    /// accepted rather than failing the already-committed deletion.
    pub async fn delete_post(&self, post_id: &str, image_id: &str) -> Result<()> {
        if post_id.is_empty() {
            return Err(AppError::validation("post_id", "post id is required"));
        }
        if image_id.is_empty() {
            return Err(AppError::validation("image_id", "image id is required"));
        }

        self.documents
            .delete(&self.collections.posts, post_id)
            .await
            .map_err(|err| AppError::PostPersistence(err.to_string()))?;

        cleanup_file(&self.files, image_id, "deleted post's image").await;
        Ok(())
    }

    /// Replace the post's liker set. Single-step, no compensation needed.
    pub async fn like_post(&self, post_id: &str, liker_ids: Vec<String>) -> Result<Post> {
        let document = self
            .documents
            .update(
                &self.collections.posts,
                post_id,
                json!({ "likes": liker_ids }),
            )
            .await?;
        decode(&self.collections.posts, document)
    }

    /// Record that a user saved a post.
    pub async fn save_post(&self, user_id: &str, post_id: &str) -> Result<SavedPost> {
        let document = self
            .documents
            .create(
                &self.collections.saves,
                &new_document_id(),
                json!({ "user": user_id, "post": post_id }),
            )
            .await?;
        decode(&self.collections.saves, document)
    }

    /// Remove a saved-post record by its own id.
    pub async fn unsave_post(&self, save_id: &str) -> Result<()> {
        self.documents
            .delete(&self.collections.saves, save_id)
            .await
    }

    /// All saved-post records for a user.
    pub async fn saved_posts(&self, user_id: &str) -> Result<Page<SavedPost>> {
        let list = self
            .documents
            .list(&self.collections.saves, &[Query::equal("user", user_id)])
            .await?;
        decode_page(&self.collections.saves, list)
    }

    pub async fn get_post(&self, post_id: &str) -> Result<Post> {
        let document = self.documents.get(&self.collections.posts, post_id).await?;
        decode(&self.collections.posts, document)
    }

    /// Latest posts, newest first.
    pub async fn recent_posts(&self) -> Result<Page<Post>> {
        let list = self
            .documents
            .list(
                &self.collections.posts,
                &[
                    Query::order_desc("$createdAt"),
                    Query::limit(self.feed.recent_limit),
                ],
            )
            .await?;
        decode_page(&self.collections.posts, list)
    }

    /// One page of the home feed, most recently updated first. Pass the
    /// last page's final post id as the cursor to fetch the next page.
    pub async fn infinite_posts(&self, cursor: Option<&str>) -> Result<Page<Post>> {
        let mut queries = vec![
            Query::order_desc("$updatedAt"),
            Query::limit(self.feed.page_size),
        ];
        if let Some(cursor) = cursor {
            queries.push(Query::cursor_after(cursor));
        }

        let list = self.documents.list(&self.collections.posts, &queries).await?;
        decode_page(&self.collections.posts, list)
    }

    /// Full-text search over captions.
    pub async fn search_posts(&self, term: &str) -> Result<Page<Post>> {
        let list = self
            .documents
            .list(&self.collections.posts, &[Query::search("caption", term)])
            .await?;
        decode_page(&self.collections.posts, list)
    }

    /// All posts by one creator, newest first.
    pub async fn user_posts(&self, user_id: &str) -> Result<Page<Post>> {
        if user_id.is_empty() {
            return Err(AppError::validation("user_id", "user id is required"));
        }

        let list = self
            .documents
            .list(
                &self.collections.posts,
                &[
                    Query::equal("creator", user_id),
                    Query::order_desc("$createdAt"),
                ],
            )
            .await?;
        decode_page(&self.collections.posts, list)
    }
}
