use std::env;
use std::path::PathBuf;

/// Front-end template used when `FORTIVOICE_URL_TEMPLATE` is unset.
pub const DEFAULT_FORTIVOICE_TEMPLATE: &str = "https://{ip}/admin";

const DEFAULT_PORT: u16 = 3005;

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared admin passphrase. Empty means any password unlocks the admin
    /// menu, which is the intended open dev mode, not an oversight.
    pub admin_password: String,
    /// URL template handed to the front end for the FortiVoice link;
    /// `{ip}` is substituted client-side.
    pub fortivoice_url_template: String,
    /// TCP port to listen on, bound on all interfaces.
    pub port: u16,
    /// Directory holding the two persisted JSON files.
    pub data_dir: PathBuf,
}

impl Config {
    /// Build a config from `ADMIN_PASSWORD`, `FORTIVOICE_URL_TEMPLATE`,
    /// `PORT` and `DATA_DIR`, falling back to defaults for any that are
    /// unset or unparsable.
    pub fn from_env() -> Self {
        Config {
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_default(),
            fortivoice_url_template: env::var("FORTIVOICE_URL_TEMPLATE")
                .unwrap_or_else(|_| DEFAULT_FORTIVOICE_TEMPLATE.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            admin_password: String::new(),
            fortivoice_url_template: DEFAULT_FORTIVOICE_TEMPLATE.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from("."),
        }
    }
}
