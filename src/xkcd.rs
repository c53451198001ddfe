// xkcd archive client: finds the newest issue, picks a random one and
// fetches its metadata (image URL and alt text).

use crate::error::{Error, Result};
use crate::http::{join_url, read_json};
use rand::Rng;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

const LATEST_CONTEXT: &str = "xkcd latest issue";
const METADATA_CONTEXT: &str = "xkcd issue metadata";

/// A selected comic: its issue number and where its metadata lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComicRef {
    pub number: u32,
    pub metadata_url: String,
}

/// The part of an issue's `info.0.json` the publisher needs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ComicMetadata {
    /// Image URL.
    pub img: String,
    /// Alt text, used as the wall post caption. May be empty.
    pub alt: String,
}

#[derive(Debug, Deserialize)]
struct LatestIssue {
    num: u32,
}

/// Blocking client for the xkcd JSON interface, rooted at `base_url`.
pub struct XkcdClient {
    client: Client,
    base_url: String,
}

impl XkcdClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        XkcdClient {
            client,
            base_url: base_url.into(),
        }
    }

    /// URL of the metadata document for issue `number`.
    pub fn metadata_url(&self, number: u32) -> String {
        join_url(&self.base_url, &format!("{}/info.0.json", number))
    }

    /// Number of the newest published issue.
    pub fn latest_issue(&self) -> Result<u32> {
        let url = join_url(&self.base_url, "info.0.json");
        let res = self.client.get(&url).send()?;
        let latest: LatestIssue = read_json(res, LATEST_CONTEXT)?;
        if latest.num == 0 {
            return Err(Error::unexpected(LATEST_CONTEXT, "latest issue number is 0"));
        }
        Ok(latest.num)
    }

    /// Pick a uniformly random issue from the whole archive.
    pub fn random_comic<R: Rng>(&self, rng: &mut R) -> Result<ComicRef> {
        let latest = self.latest_issue()?;
        let number = pick_issue(rng, latest);
        debug!(latest, number, "selected comic");
        Ok(ComicRef {
            number,
            metadata_url: self.metadata_url(number),
        })
    }

    /// Fetch the image URL and alt text of `comic`.
    pub fn metadata(&self, comic: &ComicRef) -> Result<ComicMetadata> {
        let res = self.client.get(&comic.metadata_url).send()?;
        let metadata: ComicMetadata = read_json(res, METADATA_CONTEXT)?;
        debug!(number = comic.number, img = %metadata.img, "fetched comic metadata");
        Ok(metadata)
    }
}

/// Uniform pick in `[1, latest]`. `latest` must be at least 1.
pub fn pick_issue<R: Rng>(rng: &mut R, latest: u32) -> u32 {
    rng.gen_range(1..=latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pick_issue_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for latest in [1u32, 2, 5, 17, 2900] {
            for _ in 0..500 {
                let n = pick_issue(&mut rng, latest);
                assert!((1..=latest).contains(&n), "{n} not in 1..={latest}");
            }
        }
    }

    #[test]
    fn pick_issue_with_single_issue_is_one() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(pick_issue(&mut rng, 1), 1);
    }

    #[test]
    fn pick_issue_reaches_both_ends() {
        let mut rng = StdRng::seed_from_u64(42);
        let picks: Vec<u32> = (0..1000).map(|_| pick_issue(&mut rng, 5)).collect();
        assert!(picks.contains(&1));
        assert!(picks.contains(&5));
    }

    #[test]
    fn metadata_url_is_interpolated() {
        let client = XkcdClient::new(Client::new(), "https://xkcd.com/");
        assert_eq!(client.metadata_url(614), "https://xkcd.com/614/info.0.json");
    }

    #[test]
    fn metadata_allows_empty_alt() {
        let meta: ComicMetadata =
            serde_json::from_str(r#"{"img": "https://x/a.png", "alt": "", "num": 3}"#).unwrap();
        assert_eq!(meta.alt, "");
        assert_eq!(meta.img, "https://x/a.png");
    }
}
