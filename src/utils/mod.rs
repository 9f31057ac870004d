pub mod config;
pub mod credentials;
pub mod logger;
pub mod scan_toml;
pub mod scratch;

pub use config::*;
pub use credentials::resolve_password;
pub use logger::{render_line, setup_logging};
pub use scan_toml::{ScanToml, apply_file_to_config, load_scan_toml};
pub use scratch::ScratchDir;
