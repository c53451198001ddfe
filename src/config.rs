// Run configuration. Built once in `main` from the command line and the
// environment, then handed to `workflow::run`; nothing below reads the
// process environment on its own.

use std::fmt;
use std::path::PathBuf;

pub const XKCD_BASE_URL: &str = "https://xkcd.com";
pub const VK_API_BASE_URL: &str = "https://api.vk.com/method";

/// Everything a single publish run needs.
#[derive(Clone)]
pub struct Config {
    /// Numeric id of the VK community, without the leading minus.
    pub group_id: String,
    pub access_token: String,
    /// Directory the comic image is downloaded into.
    pub image_dir: PathBuf,
    pub xkcd_base_url: String,
    pub vk_api_base_url: String,
}

impl Config {
    /// Config pointing at the production xkcd and VK endpoints.
    pub fn new(
        group_id: impl Into<String>,
        access_token: impl Into<String>,
        image_dir: impl Into<PathBuf>,
    ) -> Self {
        Config {
            group_id: group_id.into(),
            access_token: access_token.into(),
            image_dir: image_dir.into(),
            xkcd_base_url: XKCD_BASE_URL.to_string(),
            vk_api_base_url: VK_API_BASE_URL.to_string(),
        }
    }

    pub fn with_xkcd_base_url(mut self, url: impl Into<String>) -> Self {
        self.xkcd_base_url = url.into();
        self
    }

    pub fn with_vk_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.vk_api_base_url = url.into();
        self
    }
}

// Keep the token out of debug logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("group_id", &self.group_id)
            .field("access_token", &"<redacted>")
            .field("image_dir", &self.image_dir)
            .field("xkcd_base_url", &self.xkcd_base_url)
            .field("vk_api_base_url", &self.vk_api_base_url)
            .finish()
    }
}
