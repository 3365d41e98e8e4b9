//! # AkademiX Core
//!
//! On-device data layer for the AkademiX mobile client. Users, publications
//! and their comments are kept as JSON collections in a local LMDB
//! environment and served to the app over a C ABI.
//!
//! ## Quick Start
//!
//! ```no_run
//! use akademix_core::{create_store, init_mock_data, login, free_response};
//! use std::ffi::CString;
//!
//! let name = CString::new("akademix").unwrap();
//! let store = create_store(name.as_ptr());
//!
//! free_response(init_mock_data(store) as *mut _);
//!
//! let email = CString::new("demo@example.com").unwrap();
//! let password = CString::new("password").unwrap();
//! let session = login(store, email.as_ptr(), password.as_ptr());
//! free_response(session as *mut _);
//! ```
//!
//! ## FFI Functions
//!
//! Every function except [`create_store`], [`create_store_with_config`] and
//! [`free_response`] returns a JSON-encoded [`AppResponse`] as a C string
//! that must be released with [`free_response`].
//!
//! - [`create_store`] / [`create_store_with_config`] / [`close_store`]
//! - [`init_mock_data`], [`clear_all_records`]
//! - [`login`], [`register`], [`logout`], [`get_current_user`]
//! - [`get_publications`], [`get_publication_by_id`], [`get_user_publications`], [`create_publication`]
//! - [`get_comments`], [`create_comment`]
//! - [`like_publication`], [`unlike_publication`]
//! - [`get_user_profile`]
//!
//! The service itself is [`LocalStore`], usable directly from Rust over any
//! [`KeyValueStore`].

pub mod app_response;
pub mod error;
pub mod key_value;
pub mod local_db_config;
pub mod local_db_model;
pub mod local_db_state;
pub mod local_store;
pub mod mock_data;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use crate::app_response::AppResponse;
pub use crate::error::{StoreError, StoreResult};
pub use crate::key_value::{KeyValueStore, MemoryStore};
pub use crate::local_db_config::StoreConfig;
pub use crate::local_db_state::AppDbState;
pub use crate::local_store::LocalStore;

use crate::local_db_model::{NewComment, NewPublication, NewUser};

/// Store handle passed across the FFI boundary.
pub type StoreHandle = LocalStore<AppDbState>;

/// Opens (or creates) the store in directory `<name>.lmdb`.
///
/// Returns a null pointer if `name` is null, not UTF-8, or the environment
/// cannot be opened. Release the handle with [`close_store`].
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_store(name: *const c_char) -> *mut StoreHandle {
    if name.is_null() {
        warn!("Null name pointer passed to create_store");
        return std::ptr::null_mut();
    }

    let name_str = match unsafe { CStr::from_ptr(name).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in name parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    open_store(StoreConfig::new(name_str))
}

/// Opens the store from a JSON [`StoreConfig`], e.g. `{"name":"feed","mapSize":20971520}`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_store_with_config(config_json: *const c_char) -> *mut StoreHandle {
    if config_json.is_null() {
        warn!("Null config pointer passed to create_store_with_config");
        return std::ptr::null_mut();
    }

    let json = match unsafe { CStr::from_ptr(config_json).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in config parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    match StoreConfig::from_json(json) {
        Ok(config) => open_store(config),
        Err(e) => {
            warn!("Invalid store config: {e}");
            std::ptr::null_mut()
        }
    }
}

fn open_store(config: StoreConfig) -> *mut StoreHandle {
    let dir = config.db_dir();
    match AppDbState::init(config) {
        Ok(state) => {
            info!("Store ready at {}", dir.display());
            Box::into_raw(Box::new(LocalStore::new(state)))
        }
        Err(e) => {
            warn!("Failed to open store at {}: {e}", dir.display());
            std::ptr::null_mut()
        }
    }
}

/// Flushes and releases a handle from [`create_store`]. The pointer must not
/// be used afterwards.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_store(state: *mut StoreHandle) -> *const c_char {
    if state.is_null() {
        let error = AppResponse::BadRequest("Null state pointer passed to close_store".to_string());
        return response_to_c_string(&error);
    }

    let store = *unsafe { Box::from_raw(state) };
    match store.into_inner().close_database() {
        Ok(()) => response_to_c_string(&AppResponse::Ok("Store closed successfully".to_string())),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

/// Releases a string returned by any other function in this library.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(ptr) });
}

/// Seeds the demo user and publication into an empty store.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn init_mock_data(state: *mut StoreHandle) -> *const c_char {
    with_store(state, "init_mock_data", |store| {
        store.init_mock_data().map(|()| "Mock data initialized")
    })
}

/// Removes every key, session records included.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn clear_all_records(state: *mut StoreHandle) -> *const c_char {
    with_store(state, "clear_all_records", |store| {
        store.kv().clear().map(|()| "All records cleared successfully")
    })
}

/// Returns `{token, user}` on success, `NotFound` on bad credentials.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn login(state: *mut StoreHandle, email: *const c_char, password: *const c_char) -> *const c_char {
    let email = match c_ptr_to_string(email, "email") {
        Ok(s) => s,
        Err(err) => return err,
    };
    let password = match c_ptr_to_string(password, "password") {
        Ok(s) => s,
        Err(err) => return err,
    };
    with_store(state, "login", |store| store.login(&email, &password))
}

/// Expects a [`NewUser`] JSON object.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn register(state: *mut StoreHandle, json_ptr: *const c_char) -> *const c_char {
    let new_user: NewUser = match parse_json_arg(json_ptr) {
        Ok(v) => v,
        Err(err) => return err,
    };
    with_store(state, "register", |store| store.register(new_user))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn logout(state: *mut StoreHandle) -> *const c_char {
    with_store(state, "logout", |store| store.logout().map(|()| "Logged out"))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_current_user(state: *mut StoreHandle) -> *const c_char {
    with_store(state, "get_current_user", |store| store.current_user())
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_publications(state: *mut StoreHandle) -> *const c_char {
    with_store(state, "get_publications", |store| store.get_publications())
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_publication_by_id(state: *mut StoreHandle, id: u64) -> *const c_char {
    with_store(state, "get_publication_by_id", |store| store.get_publication_by_id(id))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_user_publications(state: *mut StoreHandle, user_id: u64) -> *const c_char {
    with_store(state, "get_user_publications", |store| store.get_user_publications(user_id))
}

/// Expects `{"title": ..., "content": ...}`; requires a logged-in user.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_publication(state: *mut StoreHandle, json_ptr: *const c_char) -> *const c_char {
    let data: NewPublication = match parse_json_arg(json_ptr) {
        Ok(v) => v,
        Err(err) => return err,
    };
    with_store(state, "create_publication", |store| store.create_publication(data))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_comments(state: *mut StoreHandle, publication_id: u64) -> *const c_char {
    with_store(state, "get_comments", |store| store.get_comments_by_publication_id(publication_id))
}

/// Expects `{"publicationId": ..., "content": ...}`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_comment(state: *mut StoreHandle, json_ptr: *const c_char) -> *const c_char {
    let data: NewComment = match parse_json_arg(json_ptr) {
        Ok(v) => v,
        Err(err) => return err,
    };
    with_store(state, "create_comment", |store| store.create_comment(data))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn like_publication(state: *mut StoreHandle, id: u64) -> *const c_char {
    with_store(state, "like_publication", |store| store.like_publication(id))
}

/// `InvalidState` when the publication has no likes left.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn unlike_publication(state: *mut StoreHandle, id: u64) -> *const c_char {
    with_store(state, "unlike_publication", |store| store.unlike_publication(id))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_user_profile(state: *mut StoreHandle, id: u64) -> *const c_char {
    with_store(state, "get_user_profile", |store| store.get_user_profile(id))
}

/// Resolves the handle, runs `op` and encodes its result as an [`AppResponse`].
fn with_store<T, F>(state: *mut StoreHandle, fn_name: &str, op: F) -> *const c_char
where
    T: Serialize,
    F: FnOnce(&StoreHandle) -> StoreResult<T>,
{
    let store = match unsafe { state.as_ref() } {
        Some(s) => s,
        None => {
            let error = AppResponse::BadRequest(format!("Null state pointer passed to {fn_name}"));
            return response_to_c_string(&error);
        }
    };

    let response = match op(store) {
        Ok(value) => AppResponse::success(&value),
        Err(e) => AppResponse::from(e),
    };
    response_to_c_string(&response)
}

fn parse_json_arg<T: DeserializeOwned>(json_ptr: *const c_char) -> Result<T, *const c_char> {
    let json_str = c_ptr_to_string(json_ptr, "JSON")?;
    serde_json::from_str(&json_str).map_err(|e| {
        let error = AppResponse::SerializationError(format!("Invalid JSON: {e}"));
        response_to_c_string(&error)
    })
}

/// Serializes `response` into a caller-owned C string, or null if that fails.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// On failure the error is already encoded as a `BadRequest` C string.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}
