//! Post service - resource operations over the transport adapter
//!
//! Logs intent and outcome around each call and hands the envelope back
//! unchanged. No assertions, no retries.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use checkrun_common::{DiagnosticSink, Result};

use crate::models::{Comment, Post};
use crate::transport::{ResponseEnvelope, Transport};

/// Route shapes of the remote system
pub mod routes {
    pub const POSTS: &str = "/posts";

    pub fn post(id: i64) -> String {
        format!("/posts/{}", id)
    }

    pub fn post_comments(post_id: i64) -> String {
        format!("posts/{}/comments", post_id)
    }

    pub fn comments_for_post(post_id: i64) -> String {
        format!("comments?postId={}", post_id)
    }
}

/// Operations on posts and their comments
#[derive(Clone)]
pub struct PostService {
    transport: Arc<dyn Transport>,
    diagnostics: Arc<DiagnosticSink>,
}

impl PostService {
    pub fn new(transport: Arc<dyn Transport>, diagnostics: Arc<DiagnosticSink>) -> Self {
        Self {
            transport,
            diagnostics,
        }
    }

    /// GET /posts
    pub async fn get_all_posts(&self) -> Result<ResponseEnvelope> {
        self.diagnostics.info("Sending request to retrieve all posts.");
        let response = self.transport.get(routes::POSTS).await?;
        self.log_outcome(&response);
        Ok(response)
    }

    /// GET /posts/{id}
    pub async fn get_post_by_id(&self, post_id: i64) -> Result<ResponseEnvelope> {
        self.diagnostics
            .info(format!("Sending request to retrieve post with ID: {}", post_id));
        let response = self.transport.get(&routes::post(post_id)).await?;
        self.log_outcome(&response);
        Ok(response)
    }

    /// POST /posts
    pub async fn create_post(&self, post: &Post) -> Result<ResponseEnvelope> {
        self.diagnostics.info("Sending request to create a new post.");
        let body = to_body(post)?;
        let response = self.transport.post(routes::POSTS, Some(&body)).await?;
        self.log_outcome(&response);
        Ok(response)
    }

    /// PUT /posts/{id}
    pub async fn update_post<T: Serialize>(&self, post_id: i64, update: &T) -> Result<ResponseEnvelope> {
        self.diagnostics
            .info(format!("Sending request to update post with ID: {}", post_id));
        let body = to_body(update)?;
        let response = self.transport.put(&routes::post(post_id), Some(&body)).await?;
        self.log_outcome(&response);
        Ok(response)
    }

    /// DELETE /posts/{id}
    pub async fn delete_post(&self, post_id: i64) -> Result<ResponseEnvelope> {
        self.diagnostics
            .info(format!("Sending request to delete post with ID: {}", post_id));
        let response = self.transport.delete(&routes::post(post_id)).await?;
        self.log_outcome(&response);
        Ok(response)
    }

    /// POST posts/{id}/comments
    pub async fn add_comment_to_post(&self, post_id: i64, comment: &Comment) -> Result<ResponseEnvelope> {
        self.diagnostics
            .info(format!("Adding a comment to post with ID: {}", post_id));
        let body = to_body(comment)?;
        let response = self
            .transport
            .post(&routes::post_comments(post_id), Some(&body))
            .await?;
        self.log_outcome(&response);
        if response.success {
            self.diagnostics.info("Comment successfully added.");
        } else {
            self.diagnostics.error(
                format!(
                    "Failed to add comment. Status: {}, Error: {}",
                    response.status,
                    response.error_message.as_deref().unwrap_or("")
                ),
                None,
            );
        }
        Ok(response)
    }

    /// GET comments?postId={id}
    pub async fn get_comments_for_post(&self, post_id: i64) -> Result<ResponseEnvelope> {
        self.diagnostics
            .info(format!("Retrieving comments for post with ID: {}", post_id));
        let response = self.transport.get(&routes::comments_for_post(post_id)).await?;
        if response.success {
            self.diagnostics.info("Comments successfully retrieved.");
        } else {
            self.diagnostics.info(format!(
                "Failed to retrieve comments. Status: {}, Error: {}",
                response.status,
                response.error_message.as_deref().unwrap_or("")
            ));
        }
        self.log_outcome(&response);
        Ok(response)
    }

    fn log_outcome(&self, response: &ResponseEnvelope) {
        if response.success {
            self.diagnostics.info(format!(
                "{} {} succeeded with status {} in {} ms",
                response.method, response.endpoint, response.status, response.elapsed_ms
            ));
        } else {
            self.diagnostics.error(
                format!(
                    "{} {} failed with status {}: {}",
                    response.method,
                    response.endpoint,
                    response.status,
                    response.error_message.as_deref().unwrap_or("")
                ),
                None,
            );
        }
    }
}

fn to_body<T: Serialize + ?Sized>(payload: &T) -> Result<Value> {
    Ok(serde_json::to_value(payload)?)
}

#[cfg(test)]
mod tests {
    use super::routes;

    #[test]
    fn test_route_shapes() {
        assert_eq!(routes::POSTS, "/posts");
        assert_eq!(routes::post(7), "/posts/7");
        assert_eq!(routes::post_comments(7), "posts/7/comments");
        assert_eq!(routes::comments_for_post(7), "comments?postId=7");
    }
}
