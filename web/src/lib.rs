use clap::Parser;
use sapper_core::ClientConfig;
use sapper_protocol::GameSize;
use wasm_bindgen::prelude::*;

mod counter;
mod game;
mod new_game;
mod socket;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Socket mount point or full websocket url
    #[arg(long)]
    socket: Option<String>,

    /// Channel topic to join
    #[arg(long)]
    topic: Option<String>,

    /// Board size offered by the restart button before a size is picked
    #[arg(long)]
    size: Option<GameSize>,

    /// How long to wait for an acknowledgment before giving up on a request
    #[arg(long)]
    timeout_ms: Option<u32>,
}

impl Args {
    fn into_config(self) -> ClientConfig {
        let defaults = ClientConfig::default();
        ClientConfig {
            socket_url: self.socket.unwrap_or(defaults.socket_url),
            topic: self.topic.unwrap_or(defaults.topic),
            request_timeout_ms: self.timeout_ms.unwrap_or(defaults.request_timeout_ms),
            default_size: self.size.unwrap_or(defaults.default_size),
            ..defaults
        }
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::try_parse_from(location_hash.split(['#', '&'])).expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    let config = args.into_config();
    log::debug!("config: {:?}", config);

    let root = document()
        .get_element_by_id("game")
        .expect("Could not find id=\"game\" element");

    log::debug!("App started");
    yew::Renderer::<game::GameView>::with_root_and_props(root, game::GameProps { config }).render();
}
