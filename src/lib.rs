//! Paperjet
//!
//! Renders an HTML document into a PDF with headless Chrome and delivers the
//! result inline (base64) or as an object-storage reference URL. One request,
//! one response; nothing persists between invocations.
//!
//! # Example
//!
//! ```no_run
//! use paperjet::{render, RenderConfig, RenderRequest, RenderResponse};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request: RenderRequest = serde_json::from_str(
//!     r#"{ "data": "<h1>Invoice #42</h1>", "format": "a4", "printBackground": true }"#,
//! )?;
//!
//! match render(request, &RenderConfig::default()).await {
//!     RenderResponse::Document { data } => println!("{} base64 bytes", data.len()),
//!     RenderResponse::Stored { url } => println!("uploaded to {url}"),
//!     RenderResponse::Failure { error } => eprintln!("render failed: {error}"),
//! }
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

pub mod error;
pub use error::{Error, Result};

pub mod browser;
pub mod chrome;
pub mod options;
pub mod pipeline;
pub mod request;
pub mod storage;

pub use browser::Browser;
pub use chrome::{ImageOutcome, ImageStatus};
pub use options::{PageMargins, PaperFormat, PdfOptions};
pub use pipeline::render;
pub use request::{RenderRequest, RenderResponse, RenderTarget};

/// Region used for reference URLs when the caller does not override it.
pub const DEFAULT_REGION: &str = "eu-west-2";

/// Largest document returned inline. Anything bigger must go through object
/// storage; the hosting environment caps the response payload around here.
pub const DEFAULT_MAX_INLINE_BYTES: usize = 6 * 1024 * 1024;

/// Configuration for a single render invocation
///
/// Every knob the pipeline consults lives here and is passed in at call time.
/// There is no process-wide state: tests and embedders can run alternate
/// configurations side by side without leakage.
///
/// # Examples
///
/// ```
/// let cfg = paperjet::RenderConfig::default();
/// assert_eq!(cfg.viewport.width, 1920);
/// assert!(cfg.launch_flags.iter().any(|f| f == "--no-sandbox"));
/// ```
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Chrome executable to launch; `None` lets the backend auto-detect
    pub chrome_path: Option<PathBuf>,
    /// Viewport of the rendering tab
    pub viewport: Viewport,
    /// Command-line flags passed to the browser on launch
    pub launch_flags: Vec<String>,
    /// Upper bound on any single browser command
    pub protocol_timeout: Duration,
    /// Overall bound on navigation plus the network-idle wait
    pub navigation_timeout: Duration,
    /// How long the network must stay quiet before the page counts as loaded
    pub network_idle_window: Duration,
    /// Per-image bound on the lazy-load wait
    pub image_timeout: Duration,
    /// Region used for object-storage uploads and reference URLs
    pub region: String,
    /// Largest document returned inline, in bytes
    pub max_inline_bytes: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            viewport: Viewport::default(),
            launch_flags: default_launch_flags(),
            protocol_timeout: Duration::from_secs(300),
            navigation_timeout: Duration::from_secs(30),
            network_idle_window: Duration::from_millis(500),
            image_timeout: Duration::from_secs(6),
            region: DEFAULT_REGION.to_string(),
            max_inline_bytes: DEFAULT_MAX_INLINE_BYTES,
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// The flag set used for headless, resource-constrained execution: sandboxing,
/// GPU, background throttling, telemetry, and extensions all off.
pub fn default_launch_flags() -> Vec<String> {
    [
        "--disable-features=IsolateOrigins",
        "--disable-site-isolation-trials",
        "--autoplay-policy=user-gesture-required",
        "--disable-background-networking",
        "--disable-background-timer-throttling",
        "--disable-backgrounding-occluded-windows",
        "--disable-breakpad",
        "--disable-client-side-phishing-detection",
        "--disable-component-update",
        "--disable-default-apps",
        "--disable-dev-shm-usage",
        "--disable-domain-reliability",
        "--disable-extensions",
        "--disable-features=AudioServiceOutOfProcess",
        "--disable-gpu",
        "--disable-hang-monitor",
        "--disable-ipc-flooding-protection",
        "--disable-notifications",
        "--disable-offer-store-unmasked-wallet-cards",
        "--disable-popup-blocking",
        "--disable-print-preview",
        "--disable-prompt-on-repost",
        "--disable-renderer-backgrounding",
        "--disable-setuid-sandbox",
        "--disable-speech-api",
        "--disable-sync",
        "--hide-scrollbars",
        "--ignore-gpu-blacklist",
        "--metrics-recording-only",
        "--mute-audio",
        "--no-default-browser-check",
        "--no-first-run",
        "--no-pings",
        "--no-sandbox",
        "--no-zygote",
        "--password-store=basic",
        "--use-gl=swiftshader",
        "--use-mock-keychain",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.viewport.width, 1920);
        assert_eq!(config.viewport.height, 1080);
        assert_eq!(config.region, "eu-west-2");
        assert_eq!(config.image_timeout, Duration::from_secs(6));
        assert_eq!(config.max_inline_bytes, 6 * 1024 * 1024);
    }

    #[test]
    fn test_default_flags_harden_the_browser() {
        let flags = default_launch_flags();
        for expected in ["--no-sandbox", "--disable-gpu", "--disable-extensions", "--mute-audio"] {
            assert!(
                flags.iter().any(|f| f == expected),
                "missing launch flag: {expected}"
            );
        }
    }

    #[test]
    fn test_config_is_per_call() {
        // Two configs never share flag storage
        let mut a = RenderConfig::default();
        let b = RenderConfig::default();
        a.launch_flags.push("--window-size=10,10".to_string());
        assert_eq!(a.launch_flags.len(), b.launch_flags.len() + 1);
    }
}
