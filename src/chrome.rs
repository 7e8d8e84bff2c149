//! Chrome DevTools Protocol session for rendering

use std::ffi::OsStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use headless_chrome::browser::tab::Tab;
use headless_chrome::{Browser as ChromeBrowser, LaunchOptions};
use log::{debug, warn};
use serde::Deserialize;

use crate::options::PdfOptions;
use crate::{Error, RenderConfig, Result};

/// How often the network-idle heuristic probes the page
const NETWORK_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Reports the page's load state and how many subresources have completed.
const NETWORK_PROBE: &str = r#"JSON.stringify({
    ready: document.readyState,
    resources: performance.getEntriesByType('resource').length
})"#;

/// One viewport height, to wake up scroll-activated lazy loading.
const SCROLL_VIEWPORT: &str = "window.scrollBy(0, window.innerHeight); 'scrolled'";

/// Resolves once every `<img>` has settled. Each image reports an outcome
/// instead of rejecting, so one broken image never cuts the wait short.
const IMAGE_WAIT_TEMPLATE: &str = r#"(async () => {
    const images = Array.from(document.querySelectorAll('img'));
    const outcomes = await Promise.all(images.map((img) => {
        if (!img.src) return { src: '', status: 'complete' };
        if (img.complete) return { src: img.src, status: 'complete' };
        return new Promise((resolve) => {
            const settle = (status) => () => resolve({ src: img.src, status });
            img.addEventListener('load', settle('loaded'), { once: true });
            img.addEventListener('error', settle('failed'), { once: true });
            setTimeout(settle('timeout'), {{IMAGE_TIMEOUT_MS}});
        });
    }));
    return JSON.stringify(outcomes);
})()"#;

/// How a single `<img>` settled during the image wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    /// Already decoded (or had no source) when the wait started
    Complete,
    /// Fired `load` during the wait
    Loaded,
    /// Fired `error` during the wait
    Failed,
    /// Neither event fired within the per-image bound
    Timeout,
}

/// Outcome of the image wait for one element
#[derive(Debug, Clone, Deserialize)]
pub struct ImageOutcome {
    pub src: String,
    pub status: ImageStatus,
}

#[derive(Debug, Deserialize)]
struct NetworkProbe {
    ready: String,
    resources: u64,
}

/// A synchronous headless-Chrome session owning one rendering tab
///
/// Launches the browser with the hardening flag set from [`RenderConfig`] and
/// drives the navigate / settle / print sequence over CDP. Callers that need
/// an async interface go through [`crate::Browser`], which owns one of these
/// on a worker thread.
pub struct ChromeSession {
    browser: ChromeBrowser,
    tab: Arc<Tab>,
    config: RenderConfig,
}

impl ChromeSession {
    /// Launch the browser and open the rendering tab.
    pub fn launch(config: RenderConfig) -> Result<Self> {
        let args: Vec<&OsStr> = config.launch_flags.iter().map(OsStr::new).collect();

        let mut builder = LaunchOptions::default_builder();
        builder
            .headless(true)
            .sandbox(false)
            .window_size(Some((config.viewport.width, config.viewport.height)))
            .ignore_certificate_errors(true)
            .idle_browser_timeout(config.protocol_timeout)
            .args(args);
        if let Some(path) = &config.chrome_path {
            builder.path(Some(path.clone()));
        }
        let launch_options = builder
            .build()
            .map_err(|e| Error::Launch(format!("Failed to build launch options: {}", e)))?;

        let browser = ChromeBrowser::new(launch_options)
            .map_err(|e| Error::Launch(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::Launch(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(config.protocol_timeout);

        Ok(Self {
            browser,
            tab,
            config,
        })
    }

    /// Navigate to `url` and wait until the network goes quiet.
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| Error::Navigation(format!("Navigation to {} failed: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::Navigation(format!("Wait for navigation failed: {}", e)))?;

        self.wait_for_network_idle()
    }

    /// Poll until the document is complete and no new subresource has finished
    /// for a sustained window. A heuristic for "probably done loading", bounded
    /// by the navigation timeout.
    fn wait_for_network_idle(&self) -> Result<()> {
        let deadline = Instant::now() + self.config.navigation_timeout;
        let mut resources_seen = 0u64;
        let mut quiet_since = Instant::now();

        loop {
            let probe: NetworkProbe = self.eval_json(NETWORK_PROBE, false)?;
            if probe.resources != resources_seen {
                resources_seen = probe.resources;
                quiet_since = Instant::now();
            }
            if probe.ready == "complete"
                && quiet_since.elapsed() >= self.config.network_idle_window
            {
                debug!("network idle after {} resources", resources_seen);
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(Error::Timeout(
                    self.config.navigation_timeout.as_millis() as u64
                ));
            }
            std::thread::sleep(NETWORK_POLL_INTERVAL);
        }
    }

    /// Scroll one viewport height to trigger lazy-loaded content.
    pub fn scroll_viewport(&self) -> Result<()> {
        self.tab
            .evaluate(SCROLL_VIEWPORT, false)
            .map_err(|e| Error::Script(format!("Scroll failed: {}", e)))?;
        Ok(())
    }

    /// Wait for every image to settle, each bounded by the per-image timeout.
    /// Failures and timeouts are logged and returned, never fatal.
    pub fn await_images(&self) -> Result<Vec<ImageOutcome>> {
        let script = IMAGE_WAIT_TEMPLATE.replace(
            "{{IMAGE_TIMEOUT_MS}}",
            &self.config.image_timeout.as_millis().to_string(),
        );

        let outcomes: Vec<ImageOutcome> = self.eval_json(&script, true)?;
        for outcome in &outcomes {
            match outcome.status {
                ImageStatus::Timeout => warn!("Image timeout: {}", outcome.src),
                ImageStatus::Failed => warn!("Image failed to load: {}", outcome.src),
                _ => {}
            }
        }
        Ok(outcomes)
    }

    /// Print the current page to PDF with the caller's layout options.
    pub fn print_to_pdf(&self, options: &PdfOptions) -> Result<Vec<u8>> {
        self.tab
            .print_to_pdf(Some(options.to_print_options()))
            .map_err(|e| Error::Render(format!("PDF generation failed: {}", e)))
    }

    /// Evaluate a script whose result is a JSON.stringify'd value and parse it.
    fn eval_json<T: serde::de::DeserializeOwned>(
        &self,
        script: &str,
        await_promise: bool,
    ) -> Result<T> {
        let eval = self
            .tab
            .evaluate(script, await_promise)
            .map_err(|e| Error::Script(format!("Evaluation failed: {}", e)))?;

        let value = eval
            .value
            .ok_or_else(|| Error::Script("No value returned from evaluation".into()))?;
        let raw = value
            .as_str()
            .ok_or_else(|| Error::Script("Expected a string result from evaluation".into()))?;

        serde_json::from_str(raw)
            .map_err(|e| Error::Script(format!("Malformed evaluation result: {}", e)))
    }

    /// Close the session and terminate the browser process.
    pub fn close(self) -> Result<()> {
        // Drop tab and browser explicitly so the child process exits promptly
        // and the PDF output is fully flushed before any read-back.
        drop(self.tab);
        drop(self.browser);
        Ok(())
    }
}
