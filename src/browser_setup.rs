//! Chrome/Chromium discovery and scoped browser sessions.
//!
//! Every render launches its own browser with a throwaway profile directory.
//! `BrowserSession` owns the process, its CDP handler task and the profile dir,
//! and tears all three down in `close()`; `Drop` is the fallback when a render
//! future is cancelled.

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, trace, warn};

use crate::config::ScrapeConfig;
use crate::utils::{CHROME_USER_AGENT, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

const BROWSER_COMMANDS: &[&str] = &["chromium", "chromium-browser", "google-chrome", "chrome"];

/// Well-known install locations for the current platform.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = Vec::new();

    if cfg!(target_os = "windows") {
        for var in ["PROGRAMFILES", "PROGRAMFILES(X86)", "LOCALAPPDATA"] {
            if let Ok(root) = std::env::var(var) {
                let root = PathBuf::from(root);
                paths.push(root.join(r"Google\Chrome\Application\chrome.exe"));
                paths.push(root.join(r"Chromium\Application\chrome.exe"));
            }
        }
    } else if cfg!(target_os = "macos") {
        let apps = [
            "Google Chrome.app/Contents/MacOS/Google Chrome",
            "Chromium.app/Contents/MacOS/Chromium",
        ];
        for app in apps {
            paths.push(PathBuf::from("/Applications").join(app));
            if let Some(home) = dirs::home_dir() {
                paths.push(home.join("Applications").join(app));
            }
        }
        paths.push(PathBuf::from("/opt/homebrew/bin/chromium"));
    } else {
        for p in [
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
            "/opt/google/chrome/chrome",
        ] {
            paths.push(PathBuf::from(p));
        }
    }

    paths
}

/// Find a Chrome/Chromium executable.
///
/// `CHROMIUM_PATH` wins when it points at an existing file, then the
/// platform install locations, then `which` on Unix.
pub async fn find_browser_executable() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!(target: "reportscrape::browser", "Using browser from CHROMIUM_PATH: {}", path.display());
            return Ok(path);
        }
        warn!(
            target: "reportscrape::browser",
            "CHROMIUM_PATH points to non-existent file: {}",
            path.display()
        );
    }

    if let Some(path) = candidate_paths().into_iter().find(|p| p.exists()) {
        debug!(target: "reportscrape::browser", "Found browser at: {}", path.display());
        return Ok(path);
    }

    if !cfg!(target_os = "windows") {
        for cmd in BROWSER_COMMANDS {
            if let Ok(output) = Command::new("which").arg(cmd).output()
                && output.status.success()
            {
                let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !found.is_empty() {
                    debug!(target: "reportscrape::browser", "Found browser via which: {found}");
                    return Ok(PathBuf::from(found));
                }
            }
        }
    }

    Err(anyhow::anyhow!("Chrome/Chromium executable not found"))
}

/// Download a managed Chromium into the user cache directory.
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("reportscrape")
        .join("chromium");

    info!(
        target: "reportscrape::browser",
        "No local browser found, downloading Chromium into {}",
        cache_dir.display()
    );

    tokio::fs::create_dir_all(&cache_dir)
        .await
        .context("Failed to create browser cache directory")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("Failed to build fetcher options")?,
    );

    let revision = fetcher.fetch().await.context("Failed to fetch browser")?;
    info!(
        target: "reportscrape::browser",
        "Downloaded Chromium to: {}",
        revision.folder_path.display()
    );
    Ok(revision.executable_path)
}

/// Per-launch profile directory under `chrome_data_dir` or the system temp dir.
fn profile_dir_path(config: &ScrapeConfig) -> PathBuf {
    let profile_root = config
        .chrome_data_dir()
        .cloned()
        .unwrap_or_else(std::env::temp_dir);
    profile_root.join(format!(
        "reportscrape_chrome_{}_{}",
        std::process::id(),
        uuid::Uuid::new_v4().simple()
    ))
}

fn browser_config(
    config: &ScrapeConfig,
    chrome_path: PathBuf,
    user_data_dir: &Path,
) -> Result<BrowserConfig> {
    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(Duration::from_secs(config.navigation_timeout_secs()))
        .window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
        .user_data_dir(user_data_dir)
        .chrome_executable(chrome_path);

    builder = if config.headless() {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };

    builder
        .arg(format!("--user-agent={CHROME_USER_AGENT}"))
        .arg("--no-sandbox")
        .arg("--disable-setuid-sandbox")
        .arg("--disable-dev-shm-usage")
        .arg("--disable-accelerated-2d-canvas")
        .arg("--disable-gpu")
        .arg("--disable-blink-features=AutomationControlled")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--disable-extensions")
        .arg("--mute-audio")
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))
}

/// A launched browser scoped to one render.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserSession {
    /// Launch a fresh browser with its own profile directory.
    pub async fn launch(config: &ScrapeConfig) -> Result<Self> {
        let chrome_path = match find_browser_executable().await {
            Ok(path) => path,
            Err(_) => download_managed_browser().await?,
        };

        let user_data_dir = profile_dir_path(config);
        let browser_config = browser_config(config, chrome_path, &user_data_dir)?;

        // Only touch the disk once the config is known to be valid
        std::fs::create_dir_all(&user_data_dir).context("Failed to create user data directory")?;

        let (browser, mut handler) = match Browser::launch(browser_config).await {
            Ok(launched) => launched,
            Err(e) => {
                let _ = std::fs::remove_dir_all(&user_data_dir);
                return Err(anyhow::Error::new(e).context("Failed to launch browser"));
            }
        };

        let handler = task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    let message = e.to_string();
                    // chromiumoxide does not know every CDP event Chrome emits
                    let benign = message
                        .contains("data did not match any variant of untagged enum Message")
                        || message.contains("Failed to deserialize WS response");
                    if benign {
                        trace!(target: "reportscrape::browser", "Suppressed CDP serialization error: {message}");
                    } else {
                        error!(target: "reportscrape::browser", "Browser handler error: {e:?}");
                    }
                }
            }
            trace!(target: "reportscrape::browser", "Browser handler task completed");
        });

        debug!(
            target: "reportscrape::browser",
            "Browser launched with profile {}",
            user_data_dir.display()
        );

        Ok(Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
        })
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Close the browser, wait for the process, stop the handler and remove
    /// the profile directory. Failures are logged, never returned.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(target: "reportscrape::browser", "Failed to close browser: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            warn!(target: "reportscrape::browser", "Failed to wait for browser exit: {e}");
        }
        self.handler.abort();
        self.remove_profile_dir();
    }

    fn remove_profile_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take()
            && let Err(e) = std::fs::remove_dir_all(&path)
        {
            warn!(
                target: "reportscrape::browser",
                "Failed to remove profile dir {}: {e}",
                path.display()
            );
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
        // Browser's own Drop kills the child process
        if self.user_data_dir.is_some() {
            debug!(target: "reportscrape::browser", "BrowserSession dropped without close()");
            self.remove_profile_dir();
        }
    }
}
