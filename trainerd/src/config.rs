use std::{env, path::PathBuf};

use crate::error::{Result, ServiceErr};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_DATA_DIR: &str = ".";
const DEFAULT_STATE_FILE: &str = "state.json";

/// Process configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the RPC listener binds to.
    pub addr: String,
    /// Root of the on-disk working tree.
    pub data_dir: PathBuf,
    /// Location of the persisted state blob.
    pub state_path: PathBuf,
    /// External dataset-augmentation executable.
    pub augment_script: PathBuf,
    /// External training script.
    pub train_script: PathBuf,
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// `PORT`, `AUGMENT_SCRIPT` and `TRAIN_SCRIPT` are required;
    /// `HOST`, `DATA_DIR` and `STATE_FILE` have defaults.
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = required("PORT")?;

        let data_dir =
            PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()));
        let state_file =
            env::var("STATE_FILE").unwrap_or_else(|_| DEFAULT_STATE_FILE.to_string());

        Ok(Self {
            addr: format!("{host}:{port}"),
            state_path: data_dir.join(state_file),
            augment_script: required("AUGMENT_SCRIPT")?.into(),
            train_script: required("TRAIN_SCRIPT")?.into(),
            data_dir,
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).map_err(|_| ServiceErr::InvalidConfig(format!("{key} must be set")))
}
