// Comic image download. The downloaded file is owned by a `DownloadedImage`
// guard which deletes it when dropped, so every exit path of a run cleans
// up after itself.

use crate::error::{Error, Result};
use reqwest::blocking::Client;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

/// A local image file that exists only as long as this value does.
#[derive(Debug)]
pub struct DownloadedImage {
    path: PathBuf,
    removed: bool,
}

impl DownloadedImage {
    fn claim(path: PathBuf) -> Self {
        DownloadedImage {
            path,
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now and report failures, instead of leaving it to
    /// `Drop` which can only log them.
    pub fn remove(mut self) -> Result<()> {
        self.removed = true;
        remove_if_present(&self.path).map_err(|e| Error::io(&self.path, e))
    }
}

impl Drop for DownloadedImage {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(e) = remove_if_present(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove downloaded image");
        }
    }
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed downloaded image");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// File name for an image URL: the percent-decoded last path segment.
///
/// `https://example.com/path/name%20file.png` gives `name file.png`.
pub fn file_name_from_url(image_url: &str) -> Result<String> {
    let invalid = |reason: &str| Error::InvalidUrl {
        url: image_url.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(image_url).map_err(|e| invalid(&e.to_string()))?;
    let segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    let decoded = urlencoding::decode_binary(segment.as_bytes());
    let name = String::from_utf8_lossy(&decoded).into_owned();

    if name.is_empty() || name == "." || name == ".." {
        return Err(invalid("no file name in URL path"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("file name contains a path separator"));
    }
    Ok(name)
}

/// Download `image_url` into `dir`, overwriting any file of the same name.
pub fn download(client: &Client, image_url: &str, dir: &Path) -> Result<DownloadedImage> {
    let file_name = file_name_from_url(image_url)?;
    let res = client.get(image_url).send()?.error_for_status()?;
    let bytes = res.bytes()?;

    // Claimed before writing so a failed write still gets cleaned up.
    let image = DownloadedImage::claim(dir.join(file_name));
    fs::write(image.path(), &bytes).map_err(|e| Error::io(image.path(), e))?;
    debug!(path = %image.path().display(), bytes = bytes.len(), "downloaded image");
    Ok(image)
}
