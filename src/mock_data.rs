//! First-run seed records.

use chrono::{DateTime, Utc};

use crate::local_db_model::{AuthorRef, Comment, Publication, User};

pub const DEMO_USER_ID: u64 = 1;
pub const DEMO_USER_NAME: &str = "Demo User";
pub const DEMO_USER_EMAIL: &str = "demo@example.com";
pub const DEMO_USER_PASSWORD: &str = "password";
pub const DEMO_PUBLICATION_ID: u64 = 1;
pub const DEMO_PUBLICATION_LIKES: u32 = 5;

fn demo_author() -> AuthorRef {
    AuthorRef {
        id: DEMO_USER_ID,
        name: DEMO_USER_NAME.to_string(),
    }
}

pub fn demo_user() -> User {
    User {
        id: DEMO_USER_ID,
        name: DEMO_USER_NAME.to_string(),
        email: DEMO_USER_EMAIL.to_string(),
        password: Some(DEMO_USER_PASSWORD.to_string()),
        title: Some("Professor".to_string()),
        institution: Some("Demo University".to_string()),
        bio: Some("This is a demo user for testing".to_string()),
        profile_image: Some("https://via.placeholder.com/100".to_string()),
        created_at: None,
        publications: Some(1),
        followers: Some(42),
        following: Some(15),
    }
}

pub fn demo_publication(now: DateTime<Utc>) -> Publication {
    Publication {
        id: DEMO_PUBLICATION_ID,
        title: "Introduction to Academic Research".to_string(),
        content: "This is a sample publication about academic research methods and best practices..."
            .to_string(),
        author: demo_author(),
        created_at: now,
        likes: DEMO_PUBLICATION_LIKES,
        liked: false,
        comments: vec![Comment {
            id: 1,
            content: "Great article!".to_string(),
            publication_id: None,
            author: demo_author(),
            created_at: now,
        }],
    }
}
