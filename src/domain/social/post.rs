//! Social feed posts.

use crate::domain::foundation::{OwnedByUser, PostId, Timestamp, UserId, ValidationError};

pub const POST_TEXT_MAX: usize = 280;

/// Trimmed post body of 1 to 280 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostText(String);

impl PostText {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("text", "Post text cannot be empty."));
        }
        if trimmed.chars().count() > POST_TEXT_MAX {
            return Err(ValidationError::out_of_range(
                "text",
                "Post text cannot exceed 280 characters.",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id: PostId,
    user_id: UserId,
    text: String,
    created_at: Timestamp,
    updated_at: Timestamp,
    version: i64,
}

impl Post {
    pub fn new(id: PostId, user_id: UserId, text: PostText) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            user_id,
            text: text.0,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    pub fn reconstitute(
        id: PostId,
        user_id: UserId,
        text: String,
        created_at: Timestamp,
        updated_at: Timestamp,
        version: i64,
    ) -> Self {
        Self {
            id,
            user_id,
            text,
            created_at,
            updated_at,
            version,
        }
    }

    pub fn id(&self) -> &PostId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    /// Copy carrying the version a store assigned after a conditional write.
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    pub fn edit(&mut self, text: PostText) {
        self.text = text.0;
        self.updated_at = Timestamp::now();
    }
}

impl OwnedByUser for Post {
    fn owner_id(&self) -> &UserId {
        &self.user_id
    }

    fn resource_name(&self) -> &'static str {
        "post"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn text_is_trimmed() {
        let text = PostText::parse("  Off to Kyoto!  ").unwrap();
        assert_eq!(text.as_str(), "Off to Kyoto!");
    }

    #[test]
    fn blank_text_is_rejected() {
        let err = PostText::parse("   ").unwrap_err();
        assert_eq!(err.message(), "Post text cannot be empty.");
    }

    #[test]
    fn text_limit_counts_characters_not_bytes() {
        assert!(PostText::parse(&"é".repeat(280)).is_ok());
        let err = PostText::parse(&"é".repeat(281)).unwrap_err();
        assert_eq!(err.message(), "Post text cannot exceed 280 characters.");
    }

    #[test]
    fn edit_replaces_text() {
        let mut post = Post::new(PostId::new(), UserId::new(), PostText::parse("first").unwrap());
        post.edit(PostText::parse("second").unwrap());
        assert_eq!(post.text(), "second");
    }

    proptest! {
        #[test]
        fn accepted_text_is_within_bounds(raw in "\\PC{0,300}") {
            if let Ok(text) = PostText::parse(&raw) {
                let len = text.as_str().chars().count();
                prop_assert!(len >= 1 && len <= POST_TEXT_MAX);
                prop_assert_eq!(text.as_str(), raw.trim());
            }
        }
    }
}
