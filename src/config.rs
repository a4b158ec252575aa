use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::motion::ProjectileParams;
use crate::session::SessionConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub player_health_enabled: bool,
    pub motion_seed: Option<u64>,
    pub projectile_steps: u32,
    pub easing_exponent: f64,
    pub arc_radius: f64,
    pub jitter_radius: f64,
    pub corpus_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player_health_enabled: true,
            motion_seed: None,
            projectile_steps: 20,
            easing_exponent: 2.0,
            arc_radius: 40.0,
            jitter_radius: 3.0,
            corpus_path: None,
        }
    }
}

impl Config {
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            player_health_enabled: self.player_health_enabled,
            motion_seed: self.motion_seed,
            projectile: ProjectileParams {
                steps: self.projectile_steps,
                easing: self.easing_exponent,
                arc_radius: self.arc_radius,
            },
            jitter_radius: self.jitter_radius,
            ..SessionConfig::default()
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "taja") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("taja_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
