use std::net::SocketAddr;
use std::path::PathBuf;

use envconfig::Envconfig;

use crate::body::BodyRendering;

#[derive(Envconfig, Clone)]
pub struct Config {
    #[envconfig(default = "127.0.0.1:8000")]
    pub address: SocketAddr,

    // Backing file for captured requests
    #[envconfig(from = "HTTP_TRYOUT_PERSISTENCE", default = "http_tryout.history")]
    pub persistence_path: PathBuf,

    #[envconfig(default = "hex")]
    pub body_rendering: BodyRendering,

    #[envconfig(default = "2097152")] // 2MB
    pub max_body_size: usize,

    #[envconfig(default = "true")]
    pub export_prometheus: bool,
}
