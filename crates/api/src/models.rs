//! Resource entities sent as request payloads

use serde::{Deserialize, Serialize};

/// A post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Assigned by the remote system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

impl Post {
    pub fn new(user_id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Partial update of a post's text fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdate {
    pub title: String,
    pub body: String,
}

/// A comment on a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub post_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub body: String,
}

impl Comment {
    pub fn new(
        post_id: i64,
        name: impl Into<String>,
        email: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            post_id,
            id: None,
            name: name.into(),
            email: email.into(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_wire_names() {
        let post = Post::new(1, "New Test Post", "This is a test post body");
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(
            value,
            json!({"userId": 1, "title": "New Test Post", "body": "This is a test post body"})
        );
    }

    #[test]
    fn test_post_from_remote_payload() {
        let post: Post = serde_json::from_value(json!({
            "userId": 1,
            "id": 1,
            "title": "sunt aut facere",
            "body": "quia et suscipit"
        }))
        .unwrap();
        assert_eq!(post.id, Some(1));
        assert_eq!(post.user_id, 1);
    }

    #[test]
    fn test_comment_wire_names() {
        let comment = Comment::new(1, "Test Comment", "abc@xyz.com", "This is a comment body.");
        let value = serde_json::to_value(&comment).unwrap();
        assert_eq!(value["postId"], 1);
        assert!(value.get("id").is_none());
    }
}
