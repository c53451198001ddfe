// VK API client: the four calls that put a local photo on a community wall.
//
// Each step consumes the previous step's output:
//   photos.getWallUploadServer -> multipart upload -> photos.saveWallPhoto
//   -> wall.post
// Every reply is checked for an embedded `error` object first, so a request
// the API rejected surfaces as `Error::Remote` rather than a decode failure.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::{decode, join_url, read_value};
use reqwest::blocking::{multipart, Client};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// VK API version sent with every call.
pub const API_VERSION: &str = "5.131";

const GET_UPLOAD_SERVER: &str = "photos.getWallUploadServer";
const UPLOAD: &str = "photo upload";
const SAVE_WALL_PHOTO: &str = "photos.saveWallPhoto";
const WALL_POST: &str = "wall.post";

/// Where step 2 should send the photo.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UploadServer {
    pub upload_url: String,
}

/// Upload session returned by the upload server; required to save the photo.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UploadedPhoto {
    pub server: i64,
    pub photo: String,
    pub hash: String,
}

/// First record of the `photos.saveWallPhoto` reply.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SavedPhoto {
    pub owner_id: i64,
    pub id: i64,
}

impl SavedPhoto {
    /// Attachment reference understood by `wall.post`.
    pub fn attachment(&self) -> String {
        format!("photo{}_{}", self.owner_id, self.id)
    }
}

/// Result of `wall.post`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PublishedPost {
    pub post_id: i64,
}

#[derive(Deserialize)]
struct Envelope<T> {
    response: T,
}

// The method API reports `{error_code, error_msg}`; the upload server
// sometimes sends a bare string instead.
#[derive(Deserialize)]
#[serde(untagged)]
enum RemoteError {
    Detailed { error_code: i64, error_msg: String },
    Bare(String),
}

/// Fail with `Error::Remote` when the reply carries an `error` member.
fn check_remote_error(method: &str, value: &Value) -> Result<()> {
    let Some(error) = value.get("error") else {
        return Ok(());
    };
    let (code, message) = match serde_json::from_value::<RemoteError>(error.clone()) {
        Ok(RemoteError::Detailed {
            error_code,
            error_msg,
        }) => (error_code, error_msg),
        Ok(RemoteError::Bare(message)) => (0, message),
        Err(_) => (0, error.to_string()),
    };
    Err(Error::Remote {
        method: method.to_string(),
        code,
        message,
    })
}

/// Blocking VK client bound to one community and access token.
#[derive(Clone)]
pub struct VkClient {
    client: Client,
    base_url: String,
    access_token: String,
    group_id: String,
}

impl VkClient {
    /// Take the API base URL, token and community id from `config`.
    pub fn new(client: Client, config: &Config) -> Self {
        VkClient {
            client,
            base_url: config.vk_api_base_url.clone(),
            access_token: config.access_token.clone(),
            group_id: config.group_id.clone(),
        }
    }

    fn auth_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("access_token", self.access_token.clone()),
            ("v", API_VERSION.to_string()),
        ]
    }

    fn group_params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.auth_params();
        params.push(("group_id", self.group_id.clone()));
        params
    }

    fn check(&self, method: &str, value: Value) -> Result<Value> {
        check_remote_error(method, &value)?;
        Ok(value)
    }

    /// POST a method call with query parameters and unwrap its `response`.
    fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let url = join_url(&self.base_url, method);
        let res = self.client.post(&url).query(params).send()?;
        let value = self.check(method, read_value(res, method)?)?;
        let envelope: Envelope<T> = decode(value, method)?;
        Ok(envelope.response)
    }

    /// Step 1: ask where the photo should be uploaded.
    pub fn get_wall_upload_server(&self) -> Result<UploadServer> {
        let server: UploadServer = self.call(GET_UPLOAD_SERVER, &self.group_params())?;
        debug!(upload_url = %server.upload_url, "got upload server");
        Ok(server)
    }

    /// Step 2: send the file as multipart form data, part name `photo`.
    pub fn upload_photo(&self, server: &UploadServer, path: &Path) -> Result<UploadedPhoto> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("comic.png")
            .to_string();

        let part = multipart::Part::reader(file)
            .file_name(file_name)
            .mime_str(mime_for(path))?;
        let form = multipart::Form::new().part("photo", part);

        let res = self
            .client
            .post(&server.upload_url)
            .query(&self.group_params())
            .multipart(form)
            .send()?;
        let value = self.check(UPLOAD, read_value(res, UPLOAD)?)?;
        let uploaded: UploadedPhoto = decode(value, UPLOAD)?;

        // The upload server answers 200 with an empty photo list when it
        // refused the file.
        if uploaded.photo.is_empty() || uploaded.photo == "[]" {
            return Err(Error::unexpected(UPLOAD, "upload server accepted no photo"));
        }
        debug!(server = uploaded.server, "uploaded photo");
        Ok(uploaded)
    }

    /// Step 3: store the uploaded photo in the community's wall album.
    pub fn save_wall_photo(&self, uploaded: &UploadedPhoto) -> Result<SavedPhoto> {
        let mut params = self.auth_params();
        params.push(("server", uploaded.server.to_string()));
        params.push(("photo", uploaded.photo.clone()));
        params.push(("hash", uploaded.hash.clone()));
        params.push(("group_id", self.group_id.clone()));

        let saved: Vec<SavedPhoto> = self.call(SAVE_WALL_PHOTO, &params)?;
        let first = saved
            .into_iter()
            .next()
            .ok_or_else(|| Error::unexpected(SAVE_WALL_PHOTO, "no saved photo records"))?;
        debug!(owner_id = first.owner_id, id = first.id, "saved wall photo");
        Ok(first)
    }

    /// Step 4: post on the community wall as the community itself.
    pub fn post_to_wall(&self, photo: &SavedPhoto, message: &str) -> Result<PublishedPost> {
        let mut params = self.auth_params();
        params.push(("attachments", photo.attachment()));
        params.push(("owner_id", format!("-{}", self.group_id)));
        params.push(("from_group", "1".to_string()));
        params.push(("message", message.to_string()));

        let post: PublishedPost = self.call(WALL_POST, &params)?;
        debug!(post_id = post.post_id, "created wall post");
        Ok(post)
    }

    /// Run all four steps for the photo at `path`.
    pub fn publish(&self, path: &Path, message: &str) -> Result<PublishedPost> {
        let server = self.get_wall_upload_server()?;
        let uploaded = self.upload_photo(&server, path)?;
        let saved = self.save_wall_photo(&uploaded)?;
        self.post_to_wall(&saved, message)
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
