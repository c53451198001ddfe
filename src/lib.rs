// Library root
// ------------
// The binary (`main.rs`) parses the command line and calls
// `workflow::run`; everything it needs lives here so the integration tests
// can drive a full run against mock servers.
//
// Module responsibilities:
// - `config`: the explicit run configuration.
// - `xkcd`: comic selection and metadata.
// - `image`: image download and the self-deleting file guard.
// - `vk`: the four-step VK upload/publish protocol.
// - `workflow`: glues the above into one sequential run.
pub mod config;
pub mod error;
mod http;
pub mod image;
pub mod logging;
pub mod vk;
pub mod workflow;
pub mod xkcd;

pub use config::Config;
pub use error::{Error, Result};
pub use http::build_client;
pub use workflow::{run, run_with_rng, Outcome};
