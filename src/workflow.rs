// One publish run, start to finish: pick a comic, download its image,
// publish it to the community wall, remove the image.

use crate::config::Config;
use crate::error::Result;
use crate::http::build_client;
use crate::image;
use crate::vk::VkClient;
use crate::xkcd::XkcdClient;
use rand::Rng;
use tracing::info;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub comic_number: u32,
    pub post_id: i64,
}

/// Publish a random comic using the thread-local RNG.
pub fn run(config: &Config) -> Result<Outcome> {
    run_with_rng(config, &mut rand::thread_rng())
}

/// Publish a random comic chosen with `rng`.
///
/// The downloaded image is removed on every exit path: explicitly after a
/// successful post, by the guard's `Drop` when any publish step fails.
pub fn run_with_rng<R: Rng>(config: &Config, rng: &mut R) -> Result<Outcome> {
    let client = build_client()?;
    let xkcd = XkcdClient::new(client.clone(), config.xkcd_base_url.clone());
    let vk = VkClient::new(client.clone(), config);

    let comic = xkcd.random_comic(rng)?;
    let metadata = xkcd.metadata(&comic)?;

    let downloaded = image::download(&client, &metadata.img, &config.image_dir)?;
    let post = vk.publish(downloaded.path(), &metadata.alt)?;
    downloaded.remove()?;

    info!(
        "Comic #{} was published on VKontakte. Post id = {}.",
        comic.number, post.post_id
    );
    Ok(Outcome {
        comic_number: comic.number,
        post_id: post.post_id,
    })
}
