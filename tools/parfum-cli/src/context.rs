//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use parfum_cache::QueryCache;
use parfum_store::{AdminConsole, Backend, MemoryBackend, RestBackend, Storefront};

use crate::config::{CliConfig, CONFIG_FILE_NAMES, ENV_ACCESS_TOKEN};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    pub config: CliConfig,
    /// File the config was read from, if any.
    pub config_path: Option<PathBuf>,
    pub output: Output,
    pub cwd: PathBuf,
    /// Skip confirmation prompts.
    pub assume_yes: bool,
}

/// An open backend plus, in fixture mode, where to write changes back.
pub struct Connection {
    pub backend: Arc<dyn Backend>,
    pub cache: Arc<QueryCache>,
    fixture: Option<(Arc<MemoryBackend>, PathBuf)>,
}

impl Context {
    /// Load context from config file and environment.
    pub fn load(
        config_path: Option<&str>,
        fixture: Option<&str>,
        assume_yes: bool,
        output: Output,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (mut config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                (CliConfig::load(&path)?, Some(path))
            }
            None => match Self::find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };
        config.apply_env();
        if let Some(fixture) = fixture {
            config.backend.fixture = Some(PathBuf::from(fixture));
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            assume_yes,
        })
    }

    /// Find a config file in the directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_FILE_NAMES {
                let path = current.join(name);
                if path.exists() {
                    return Some(path);
                }
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }

    /// Open the configured backend. A fixture wins over a URL.
    pub async fn connect(&self) -> Result<Connection> {
        let cache = Arc::new(match self.config.shop.cache_ttl() {
            Some(ttl) => QueryCache::with_ttl(ttl),
            None => QueryCache::new(),
        });

        if let Some(fixture) = &self.config.backend.fixture {
            let path = self.resolve_path(&fixture.to_string_lossy());
            self.output.debug(&format!("Using fixture {}", path.display()));
            tracing::debug!(fixture = %path.display(), "opening fixture backend");
            let memory = Arc::new(
                MemoryBackend::load(&path)
                    .await
                    .with_context(|| format!("Failed to load fixture {}", path.display()))?,
            );
            return Ok(Connection {
                backend: memory.clone(),
                cache,
                fixture: Some((memory, path)),
            });
        }

        let Some(url) = &self.config.backend.url else {
            bail!(
                "No backend configured. Set backend.url or backend.fixture, \
                 or run `parfum config init`."
            );
        };
        let Some(anon_key) = &self.config.backend.anon_key else {
            bail!("backend.anon_key is required for {}", url);
        };
        self.output.debug(&format!("Using backend {}", url));
        tracing::debug!(
            %url,
            admin_session = self.config.backend.access_token.is_some(),
            "opening REST backend"
        );

        let mut rest = RestBackend::new(url.clone(), anon_key.clone());
        if let Some(token) = &self.config.backend.access_token {
            rest = rest.with_access_token(token.clone());
        }
        Ok(Connection {
            backend: Arc::new(rest),
            cache,
            fixture: None,
        })
    }

    pub fn storefront(&self, conn: &Connection) -> Storefront<dyn Backend> {
        Storefront::new(conn.backend.clone(), conn.cache.clone())
            .with_shipping_policy(self.config.shop.shipping_policy())
            .with_page_size(self.config.shop.catalog_page_size)
    }

    /// Sign in as an administrator with the configured session token.
    pub async fn admin(&self, conn: &Connection) -> Result<AdminConsole<dyn Backend>> {
        let Some(token) = &self.config.backend.access_token else {
            bail!("Admin commands need a session token. Set {}.", ENV_ACCESS_TOKEN);
        };
        let spinner = self.output.spinner("Checking admin session...");
        let console =
            AdminConsole::authorize(conn.backend.clone(), conn.cache.clone(), token).await;
        spinner.finish_and_clear();
        let console = console.context("Admin sign-in failed")?;
        self.output
            .debug(&format!("Signed in as {}", console.user().label()));
        Ok(console)
    }

    /// Ask before a change. `--yes` and JSON mode answer yes.
    pub fn confirm(&self, prompt: &str) -> Result<bool> {
        if self.assume_yes || self.output.is_json() {
            return Ok(true);
        }
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }
}

impl Connection {
    /// Write fixture changes back to disk. No-op for the hosted backend.
    pub async fn persist(&self) -> Result<()> {
        if let Some((memory, path)) = &self.fixture {
            memory
                .save(path)
                .await
                .with_context(|| format!("Failed to save fixture {}", path.display()))?;
            tracing::debug!(fixture = %path.display(), "fixture saved");
        }
        Ok(())
    }
}

fn resolve(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
