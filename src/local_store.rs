//! The local store service: users, publications and their comments.
//!
//! Collections live as JSON arrays under fixed keys of a [`KeyValueStore`].
//! Every mutation reads the whole collection, changes it in memory and writes
//! the whole collection back. Nothing guards the gap between the read and the
//! write, so two interleaved mutations of the same collection lose the
//! earlier one.

use chrono::Utc;
use log::{debug, info, warn};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::key_value::KeyValueStore;
use crate::local_db_model::{Comment, NewComment, NewPublication, NewUser, Publication, Session, User};
use crate::mock_data;

pub const USERS_KEY: &str = "users";
pub const PUBLICATIONS_KEY: &str = "publications";
pub const TOKEN_KEY: &str = "token";
pub const CURRENT_USER_KEY: &str = "currentUser";

const MAX_FOLLOWERS: u32 = 100;
const MAX_FOLLOWING: u32 = 50;

pub struct LocalStore<S> {
    kv: S,
}

impl<S: KeyValueStore> LocalStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn into_inner(self) -> S {
        self.kv
    }

    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        match self.kv.get(key)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> StoreResult<()> {
        let json = serde_json::to_string(items)?;
        self.kv.set(key, &json)?;
        debug!("Persisted {} records under '{}'", items.len(), key);
        Ok(())
    }

    fn open_session(&self, token: &str, user: &User) -> StoreResult<()> {
        self.kv.set(TOKEN_KEY, token)?;
        self.kv.set(CURRENT_USER_KEY, &serde_json::to_string(user)?)?;
        Ok(())
    }

    pub fn get_users(&self) -> StoreResult<Vec<User>> {
        self.read_collection(USERS_KEY)
    }

    /// Plaintext match on email and password.
    pub fn login(&self, email: &str, password: &str) -> StoreResult<Session> {
        let users: Vec<User> = self.read_collection(USERS_KEY)?;
        let Some(user) = users
            .into_iter()
            .find(|u| u.email == email && u.password.as_deref() == Some(password))
        else {
            warn!("Login rejected for {email}");
            return Err(StoreError::NotFound("Invalid credentials".to_string()));
        };

        let token = new_token();
        let user = user.without_password();
        self.open_session(&token, &user)?;
        info!("User {} logged in", user.id);
        Ok(Session { token, user })
    }

    pub fn register(&self, new_user: NewUser) -> StoreResult<User> {
        let mut users: Vec<User> = self.read_collection(USERS_KEY)?;
        if users.iter().any(|u| u.email == new_user.email) {
            warn!("Registration rejected, email already in use: {}", new_user.email);
            return Err(StoreError::Conflict("User already exists".to_string()));
        }

        let user = new_user.into_user(next_id(users.len()), Utc::now());
        users.push(user.clone());
        self.write_collection(USERS_KEY, &users)?;

        let user = user.without_password();
        self.open_session(&new_token(), &user)?;
        info!("Registered user {}", user.id);
        Ok(user)
    }

    pub fn logout(&self) -> StoreResult<()> {
        self.kv.remove(TOKEN_KEY)?;
        self.kv.remove(CURRENT_USER_KEY)?;
        Ok(())
    }

    pub fn current_user(&self) -> StoreResult<User> {
        match self.kv.get(CURRENT_USER_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Err(StoreError::NotAuthenticated),
        }
    }

    pub fn session_token(&self) -> StoreResult<Option<String>> {
        self.kv.get(TOKEN_KEY)
    }

    pub fn get_publications(&self) -> StoreResult<Vec<Publication>> {
        self.read_collection(PUBLICATIONS_KEY)
    }

    pub fn get_publication_by_id(&self, id: u64) -> StoreResult<Publication> {
        let publications: Vec<Publication> = self.read_collection(PUBLICATIONS_KEY)?;
        publications
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| publication_not_found(id))
    }

    pub fn get_user_publications(&self, user_id: u64) -> StoreResult<Vec<Publication>> {
        let publications: Vec<Publication> = self.read_collection(PUBLICATIONS_KEY)?;
        Ok(publications
            .into_iter()
            .filter(|p| p.author.id == user_id)
            .collect())
    }

    /// Attributes the publication to the session's current user.
    pub fn create_publication(&self, data: NewPublication) -> StoreResult<Publication> {
        let author = self.current_user()?.author_ref();
        let mut publications: Vec<Publication> = self.read_collection(PUBLICATIONS_KEY)?;

        let publication = Publication {
            id: next_id(publications.len()),
            title: data.title,
            content: data.content,
            author,
            created_at: Utc::now(),
            likes: 0,
            liked: false,
            comments: Vec::new(),
        };
        publications.push(publication.clone());
        self.write_collection(PUBLICATIONS_KEY, &publications)?;
        Ok(publication)
    }

    pub fn get_comments_by_publication_id(&self, publication_id: u64) -> StoreResult<Vec<Comment>> {
        Ok(self.get_publication_by_id(publication_id)?.comments)
    }

    /// The comment is attributed to the publication's author, not to the
    /// session user. Existing clients render comments that way.
    pub fn create_comment(&self, data: NewComment) -> StoreResult<Comment> {
        let mut publications: Vec<Publication> = self.read_collection(PUBLICATIONS_KEY)?;
        let publication = publications
            .iter_mut()
            .find(|p| p.id == data.publication_id)
            .ok_or_else(|| publication_not_found(data.publication_id))?;

        let comment = Comment {
            id: next_id(publication.comments.len()),
            content: data.content,
            publication_id: Some(data.publication_id),
            author: publication.author.clone(),
            created_at: Utc::now(),
        };
        publication.comments.push(comment.clone());
        self.write_collection(PUBLICATIONS_KEY, &publications)?;
        Ok(comment)
    }

    pub fn like_publication(&self, id: u64) -> StoreResult<Publication> {
        self.update_publication(id, |publication| {
            publication.likes += 1;
            Ok(())
        })
    }

    /// Fails with [`StoreError::InvalidState`] once likes reach zero.
    pub fn unlike_publication(&self, id: u64) -> StoreResult<Publication> {
        self.update_publication(id, |publication| {
            if publication.likes == 0 {
                warn!("Unlike rejected, publication {} has no likes", publication.id);
                return Err(StoreError::InvalidState(format!(
                    "Publication {} is already unliked",
                    publication.id
                )));
            }
            publication.likes -= 1;
            Ok(())
        })
    }

    fn update_publication<F>(&self, id: u64, apply: F) -> StoreResult<Publication>
    where
        F: FnOnce(&mut Publication) -> StoreResult<()>,
    {
        let mut publications: Vec<Publication> = self.read_collection(PUBLICATIONS_KEY)?;
        let publication = publications
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| publication_not_found(id))?;
        apply(publication)?;
        let updated = publication.clone();
        self.write_collection(PUBLICATIONS_KEY, &publications)?;
        Ok(updated)
    }

    /// `publications` is the real authored count. `followers` and `following`
    /// are mock values drawn fresh on every call.
    pub fn get_user_profile(&self, id: u64) -> StoreResult<User> {
        let users: Vec<User> = self.read_collection(USERS_KEY)?;
        let user = users
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("User {id} not found")))?;
        let authored = self.get_user_publications(id)?.len();

        let mut rng = rand::thread_rng();
        let mut profile = user.without_password();
        profile.publications = Some(u32::try_from(authored).unwrap_or(u32::MAX));
        profile.followers = Some(rng.gen_range(0..MAX_FOLLOWERS));
        profile.following = Some(rng.gen_range(0..MAX_FOLLOWING));
        Ok(profile)
    }

    /// Seeds the demo user and demo publication into empty collections.
    pub fn init_mock_data(&self) -> StoreResult<()> {
        let users: Vec<User> = self.read_collection(USERS_KEY)?;
        if users.is_empty() {
            self.write_collection(USERS_KEY, &[mock_data::demo_user()])?;
            info!("Seeded demo user");
        }

        let publications: Vec<Publication> = self.read_collection(PUBLICATIONS_KEY)?;
        if publications.is_empty() {
            self.write_collection(PUBLICATIONS_KEY, &[mock_data::demo_publication(Utc::now())])?;
            info!("Seeded demo publication");
        }
        Ok(())
    }
}

fn next_id(len: usize) -> u64 {
    len as u64 + 1
}

fn new_token() -> String {
    format!("mock-token-{}", Utc::now().timestamp_millis())
}

fn publication_not_found(id: u64) -> StoreError {
    StoreError::NotFound(format!("Publication {id} not found"))
}
