use clap::Parser;
use std::path::PathBuf;
use xkcd_vk_poster::config::Config;

#[derive(Parser)]
#[command(name = "xkcd-vk-poster")]
#[command(version, about = "Publish a random xkcd comic to a VK community wall")]
pub struct Cli {
    /// VK community id (without the leading minus)
    #[arg(long, env = "VK_GROUP_ID")]
    pub group_id: String,

    /// VK access token with photos and wall permissions
    #[arg(long, env = "VK_API_KEY", hide_env_values = true)]
    pub token: String,

    /// Directory the comic image is downloaded into [default: current directory]
    #[arg(long)]
    pub image_dir: Option<PathBuf>,

    /// File the run log is appended to
    #[arg(long, env = "XKCD_VK_LOG_FILE", default_value = "comic.log")]
    pub log_file: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn into_config(self) -> anyhow::Result<Config> {
        let image_dir = match self.image_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        Ok(Config::new(self.group_id, self.token, image_dir))
    }
}
