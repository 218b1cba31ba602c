//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "agent-debate";
const PROJECT_FILES: [&str; 2] = ["debate.toml", ".debate.toml"];
const ENV_PREFIX: &str = "AGENT_DEBATE_";

/// Finds and merges configuration sources into one [`FileConfig`]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources
    ///
    /// Later sources override earlier ones:
    /// 1. Built-in defaults
    /// 2. Global: `$XDG_CONFIG_HOME/agent-debate/config.toml`
    /// 3. Project: `./debate.toml` or `./.debate.toml`
    /// 4. Explicit `--config` path
    /// 5. `AGENT_DEBATE_*` environment variables (`AGENT_DEBATE_DEBATE__ROUNDS=3`)
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(Self::global_config_path(), Self::project_config_path(), config_path)
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(
        global: Option<PathBuf>,
        project: Option<PathBuf>,
        explicit: Option<&PathBuf>,
    ) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global) = global.filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(global));
        }
        if let Some(project) = project {
            figment = figment.merge(Toml::file(project));
        }
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// `$XDG_CONFIG_HOME/agent-debate/config.toml`, whether or not it exists
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// The first project-level config file found in the working directory
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        println!("Configuration sources (lowest to highest priority):");
        println!("  [     ] Default: built-in defaults");

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", mark, path.display());
        }

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND] Project: {}", path.display()),
            None => println!("  [     ] Project: ./debate.toml or ./.debate.toml"),
        }

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        println!("  [     ] Environment: {}*", ENV_PREFIX);
    }
}
