use crate::{
    domain::PostRepository,
    errors::RepoError,
    models::{NewPost, Post},
};
use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_dynamodb::{
    types::AttributeValue,
    Client as DynamoDbClient,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{self, info};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct DynamoDbPostRepository {
    client: DynamoDbClient,
    table_name: String,
}

impl DynamoDbPostRepository {
    /// Creates a new repository instance configured for a specific table.
    pub fn new(client: DynamoDbClient, table_name: String) -> Self {
        info!(%table_name, "Initializing DynamoDbPostRepository");
        Self { client, table_name }
    }
}

#[async_trait]
impl PostRepository for DynamoDbPostRepository {
    /// Stores a new post with PutItem. Ids are fresh v4 UUIDs, so no condition is needed.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        let post = Post {
            id: Uuid::new_v4(),
            name: post.name,
            prompt: post.prompt,
            photo: post.photo,
            created_at: Utc::now(),
        };

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(post_to_item(&post)))
            .send()
            .await
            .context(format!("DynamoDB (table: {}): Failed to put post (id: {})", self.table_name, post.id))
            .map_err(RepoError::BackendError)?;

        tracing::debug!(post_id = %post.id, table_name = %self.table_name, "DynamoDB: Post stored");
        Ok(post)
    }

    /// Lists all posts using DynamoDB Scan, then restores insertion order.
    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        tracing::debug!("DynamoDB: Scanning table '{}' for all posts", self.table_name);
        let mut posts: Vec<Post> = Vec::new();
        let mut last_evaluated_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let resp = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(last_evaluated_key.take())
                .send()
                .await
                .context(format!("DynamoDB: Failed to scan table '{}'", self.table_name))
                .map_err(RepoError::BackendError)?;

            for item in resp.items.unwrap_or_default() {
                match item_to_post(&item) {
                    Some(post) => posts.push(post),
                    None => {
                        let item_id = item.get("id").and_then(|v| v.as_s().ok());
                        tracing::error!(item.id = ?item_id, table_name = %self.table_name, "DynamoDB: Failed to parse item from scan into Post");
                        return Err(RepoError::DataCorruption(format!(
                            "DynamoDB: Failed to parse item {:?} during scan of table '{}'",
                            item_id, self.table_name
                        )));
                    }
                }
            }

            last_evaluated_key = resp.last_evaluated_key;
            if last_evaluated_key.is_none() {
                break;
            }
            tracing::debug!("DynamoDB Scan (table: {}): Continuing with LastEvaluatedKey...", self.table_name);
        }

        // Scan order is arbitrary.
        posts.sort_by_key(|post| post.created_at);
        tracing::info!("DynamoDB (table: {}): Successfully listed {} posts", self.table_name, posts.len());
        Ok(posts)
    }
}

fn post_to_item(post: &Post) -> HashMap<String, AttributeValue> {
    HashMap::from([
        ("id".to_string(), AttributeValue::S(post.id.to_string())),
        ("name".to_string(), AttributeValue::S(post.name.clone())),
        ("prompt".to_string(), AttributeValue::S(post.prompt.clone())),
        ("photo".to_string(), AttributeValue::S(post.photo.clone())),
        ("created_at".to_string(), AttributeValue::S(post.created_at.to_rfc3339())),
    ])
}

fn item_to_post(item: &HashMap<String, AttributeValue>) -> Option<Post> {
    let id = item
        .get("id")?
        .as_s()
        .ok()
        .and_then(|s| Uuid::parse_str(s).ok())?;
    let name = item.get("name")?.as_s().ok()?.to_string();
    let prompt = item.get("prompt")?.as_s().ok()?.to_string();
    let photo = item.get("photo")?.as_s().ok()?.to_string();
    let created_at = item
        .get("created_at")?
        .as_s()
        .ok()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())?
        .with_timezone(&Utc);

    Some(Post {
        id,
        name,
        prompt,
        photo,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        Post {
            id: Uuid::new_v4(),
            name: String::new(),
            prompt: "a cat".into(),
            photo: "AAAA".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn item_conversion_keeps_every_field() {
        let post = sample_post();
        let restored = item_to_post(&post_to_item(&post)).unwrap();
        assert_eq!(restored.id, post.id);
        assert_eq!(restored.name, "");
        assert_eq!(restored.photo, "AAAA");
        assert_eq!(restored.created_at.timestamp_micros(), post.created_at.timestamp_micros());
    }

    #[test]
    fn items_missing_fields_are_rejected() {
        let mut item = post_to_item(&sample_post());
        item.remove("photo");
        assert!(item_to_post(&item).is_none());

        let mut bad_id = post_to_item(&sample_post());
        bad_id.insert("id".into(), AttributeValue::S("not-a-uuid".into()));
        assert!(item_to_post(&bad_id).is_none());
    }
}
