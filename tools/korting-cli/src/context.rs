//! CLI execution context.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use korting_data::{DataSource, HttpSource, MemorySource};

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;
use crate::transport::ReqwestTransport;

/// Source overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct SourceOverrides {
    pub api_url: Option<String>,
    pub catalog: Option<String>,
}

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration, with command line overrides applied.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(
        config_path: Option<&str>,
        overrides: SourceOverrides,
        output: Output,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (mut config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((path, config)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        // A catalog given on the command line must not lose to a configured URL.
        if let Some(catalog) = overrides.catalog {
            config.source.catalog = Some(catalog);
            config.source.api_url = None;
        }
        if let Some(url) = overrides.api_url {
            config.source.api_url = Some(url);
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(PathBuf, CliConfig)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config_path, config));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the config file, or the working
    /// directory when there is none.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = PathBuf::from(path);
        if path.is_absolute() {
            return path;
        }
        match self.config_path.as_ref().and_then(|p| p.parent()) {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(path),
            _ => self.cwd.join(path),
        }
    }

    /// HTTP source for the configured API, if one is configured.
    pub fn http_source(&self) -> Result<Option<HttpSource<ReqwestTransport>>> {
        let Some(url) = self.config.source.api_url.as_deref() else {
            return Ok(None);
        };
        let transport =
            ReqwestTransport::new(Duration::from_secs(self.config.source.timeout_secs))?;
        Ok(Some(HttpSource::new(url, transport)))
    }

    /// Build the configured data source.
    pub fn data_source(&self) -> Result<Box<dyn DataSource>> {
        if let Some(source) = self.http_source()? {
            tracing::debug!(api_url = source.base_url(), "using HTTP source");
            return Ok(Box::new(source));
        }

        if let Some(catalog) = self.config.source.catalog.as_deref() {
            let path = self.resolve_path(catalog);
            let source = MemorySource::from_json_file(&path)
                .with_context(|| format!("Failed to load catalog: {}", path.display()))?;
            tracing::debug!(catalog = %path.display(), offers = source.len(), "using catalog source");
            return Ok(Box::new(source));
        }

        bail!(
            "No data source configured. Pass --api-url or --catalog, \
             or run `korting config init`."
        )
    }
}
