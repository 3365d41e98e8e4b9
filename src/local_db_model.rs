//! Records persisted in the `users` and `publications` collections.
//!
//! Field names serialize in camelCase, which is what the mobile client reads
//! and writes. A [`Publication`] carries its comments inline; there is no
//! top-level comment collection.
//!
//! ```rust
//! use akademix_core::local_db_model::Publication;
//!
//! let json = r#"{
//!     "id": 1,
//!     "title": "Introduction to Academic Research",
//!     "content": "...",
//!     "author": {"id": 1, "name": "Demo User"},
//!     "createdAt": "2024-01-15T10:30:00Z",
//!     "likes": 5,
//!     "liked": false,
//!     "comments": []
//! }"#;
//! let publication: Publication = serde_json::from_str(json)?;
//! assert_eq!(publication.author.name, "Demo User");
//! # Ok::<(), serde_json::Error>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account.
///
/// `password` is only ever `Some` inside the persisted `users` collection;
/// every record handed back to a caller goes through [`User::without_password`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    // Denormalized counters. Only the demo seed stores them; profile reads
    // recompute all three.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publications: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following: Option<u32>,
}

impl User {
    pub fn without_password(mut self) -> Self {
        self.password = None;
        self
    }

    pub fn author_ref(&self) -> AuthorRef {
        AuthorRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Point-in-time copy of an author. Renaming the user does not update it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub author: AuthorRef,
    pub created_at: DateTime<Utc>,
    pub likes: u32,
    /// Written as `false` on create and never touched by like/unlike.
    #[serde(default)]
    pub liked: bool,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique within the parent publication only.
    pub id: u64,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_id: Option<u64>,
    pub author: AuthorRef,
    pub created_at: DateTime<Utc>,
}

/// Returned by a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Register payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            title: None,
            institution: None,
            bio: None,
            profile_image: None,
        }
    }

    pub(crate) fn into_user(self, id: u64, created_at: DateTime<Utc>) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password: Some(self.password),
            title: self.title,
            institution: self.institution,
            bio: self.bio,
            profile_image: self.profile_image,
            created_at: Some(created_at),
            publications: None,
            followers: None,
            following: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPublication {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub publication_id: u64,
    pub content: String,
}
