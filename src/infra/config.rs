use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::{AppContext, InitArgs};
use crate::core::assemble::DefinitionsUnit;
use crate::core::graph::PairingRule;

/// Config files probed in priority order; the first one found wins
const CONFIG_FILES: [&str; 4] = ["amalgam.toml", ".amalgam.toml", "amalgam.yaml", "amalgam.json"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Merge and output settings
    pub merge: MergeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig
{
    /// Unit split into front matter and body
    pub defines_path: Utf8PathBuf,

    /// Marker line inside `defines_path`
    pub marker: String,

    /// Directory receiving merged files
    pub output_dir: PathBuf,

    /// Extension of merged files
    pub output_extension: String,

    /// chrono format string for the output name and header
    pub timestamp_format: String,

    /// Copy the merged text to the clipboard
    pub clipboard: bool,

    /// Declaration -> definition suffix pairs
    pub pairs: Vec<PairingRule>,
}

impl Default for MergeConfig
{
    fn default() -> Self
    {
        let defs = DefinitionsUnit::default();
        Self {
            defines_path: defs.path,
            marker: defs.marker,
            output_dir: PathBuf::from("codes"),
            output_extension: "cpp".to_string(),
            timestamp_format: "%Y:%m:%d-%H:%M:%S".to_string(),
            clipboard: true,
            pairs: vec![PairingRule::default()],
        }
    }
}

impl MergeConfig
{
    pub fn definitions(&self) -> DefinitionsUnit
    {
        DefinitionsUnit {
            path: self.defines_path.clone(),
            marker: self.marker.clone(),
        }
    }
}

/// Load configuration from the working directory.
pub fn load_config() -> Result<Config>
{
    load_config_from(Path::new("."))
}

/// Load configuration from `dir`, layering `AMALGAM_*` environment variables
/// on top (`AMALGAM_MERGE__MARKER`, `AMALGAM_MERGE__CLIPBOARD`, ...).
pub fn load_config_from(dir: &Path) -> Result<Config>
{
    let mut builder = config::Config::builder();

    for name in &CONFIG_FILES
    {
        let path = dir.join(name);
        if path.is_file()
        {
            debug!(path = %path.display(), "loading config file");
            builder = builder.add_source(config::File::from(path));
            break;
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("AMALGAM")
            .prefix_separator("_")
            .separator("__"),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join(CONFIG_FILES[0]);

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            println!("Would create config file at {}:\n{toml_string}", config_path.display());
        }
        return Ok(());
    }

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
