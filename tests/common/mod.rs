// Mock xkcd + VK backend for end-to-end runs. The mock server lives on its
// own tokio runtime; the code under test stays blocking on the test thread.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};
use xkcd_vk_poster::Config;

pub const GROUP_ID: &str = "77";
pub const TOKEN: &str = "test-token";
pub const OWNER_ID: i64 = -77;
pub const PHOTO_ID: i64 = 456239017;
pub const POST_ID: i64 = 31337;
pub const IMAGE_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake image";

/// The four VK calls, in protocol order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    UploadServer,
    Upload,
    Save,
    Post,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::UploadServer, Step::Upload, Step::Save, Step::Post];

    pub fn path(self) -> &'static str {
        match self {
            Step::UploadServer => "/method/photos.getWallUploadServer",
            Step::Upload => "/upload",
            Step::Save => "/method/photos.saveWallPhoto",
            Step::Post => "/method/wall.post",
        }
    }
}

pub struct Backend {
    pub server: MockServer,
    pub rt: Runtime,
    pub image_dir: TempDir,
}

impl Backend {
    pub fn start() -> Self {
        let rt = Runtime::new().expect("tokio runtime");
        let server = rt.block_on(MockServer::start());
        Backend {
            server,
            rt,
            image_dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn config(&self) -> Config {
        Config::new(GROUP_ID, TOKEN, self.image_dir.path())
            .with_xkcd_base_url(self.uri())
            .with_vk_api_base_url(format!("{}/method", self.uri()))
    }

    pub fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    pub fn mount_comic(&self, latest: Value, alt: &str) {
        self.mount(
            Mock::given(method("GET"))
                .and(path("/info.0.json"))
                .respond_with(ResponseTemplate::new(200).set_body_json(latest)),
        );
        self.mount(
            Mock::given(method("GET"))
                .and(path_regex(r"^/\d+/info\.0\.json$"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "img": format!("{}/comics/name%20file.png", self.uri()),
                    "alt": alt,
                    "title": "Test comic",
                }))),
        );
        self.mount(
            Mock::given(method("GET"))
                .and(path_regex(r"^/comics/[^/]+\.png$"))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(IMAGE_BYTES)),
        );
    }

    /// Mount a successful reply for every VK step except `failing`, which
    /// gets an API error object instead.
    pub fn mount_vk(&self, failing: Option<Step>) {
        for step in Step::ALL {
            let template = if failing == Some(step) {
                ResponseTemplate::new(200).set_body_json(json!({
                    "error": {"error_code": 100, "error_msg": "One of the parameters specified was missing or invalid"}
                }))
            } else {
                ResponseTemplate::new(200).set_body_json(self.success_body(step))
            };
            self.mount_step(step, template);
        }
    }

    fn mount_step(&self, step: Step, template: ResponseTemplate) {
        self.mount(
            Mock::given(method("POST"))
                .and(path(step.path()))
                .respond_with(template),
        );
    }

    /// Reply to `step` with `template`, taking precedence over `mount_vk`.
    pub fn override_step(&self, step: Step, template: ResponseTemplate) {
        self.mount(
            Mock::given(method("POST"))
                .and(path(step.path()))
                .respond_with(template)
                .with_priority(1),
        );
    }

    fn success_body(&self, step: Step) -> Value {
        match step {
            Step::UploadServer => json!({
                "response": {
                    "upload_url": format!("{}/upload", self.uri()),
                    "album_id": -14,
                    "user_id": 1
                }
            }),
            Step::Upload => json!({
                "server": 851428,
                "photo": "[{\"markers_restarted\":true,\"photo\":\"abc\"}]",
                "hash": "d41d8cd98f00b204e9800998ecf8427e"
            }),
            Step::Save => json!({
                "response": [{"owner_id": OWNER_ID, "id": PHOTO_ID, "album_id": -14}]
            }),
            Step::Post => json!({"response": {"post_id": POST_ID}}),
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.rt
            .block_on(self.server.received_requests())
            .expect("request recording enabled")
    }

    pub fn requests_to(&self, request_path: &str) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.path() == request_path)
            .collect()
    }

    pub fn image_dir_is_empty(&self) -> bool {
        dir_is_empty(self.image_dir.path())
    }
}

pub fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .expect("read image dir")
        .next()
        .is_none()
}

pub fn query_value(request: &Request, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
