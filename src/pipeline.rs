//! The render pipeline: launch, load, settle, print, deliver
//!
//! One linear sequence per invocation. Every failure funnels through the
//! top-level boundary in [`render`] and comes back as response data; callers
//! never see an `Err`.

use std::time::Instant;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as Base64Engine;
use log::{error, info};
use tempfile::{Builder, NamedTempFile};
use url::Url;

use crate::browser::Browser;
use crate::request::{RenderRequest, RenderResponse, RenderTarget};
use crate::storage::{self, PDF_CONTENT_TYPE};
use crate::{Error, RenderConfig, Result};

/// Render one request to completion.
///
/// The outermost error boundary: anything that goes wrong anywhere in the
/// pipeline is logged and converted into [`RenderResponse::Failure`]. No
/// retries, no partial results.
pub async fn render(request: RenderRequest, config: &RenderConfig) -> RenderResponse {
    match run(request, config).await {
        Ok(response) => response,
        Err(err) => {
            error!("render failed: {}", err);
            RenderResponse::Failure {
                error: err.to_string(),
            }
        }
    }
}

async fn run(request: RenderRequest, config: &RenderConfig) -> Result<RenderResponse> {
    request.validate()?;
    let started = Instant::now();

    let browser = Browser::launch(config.clone()).await?;
    info!("browser launched: {} ms", started.elapsed().as_millis());

    // Resolve the target. The markup scratch file must outlive navigation, so
    // its guard stays bound until the pipeline returns.
    let _markup_file: Option<NamedTempFile>;
    let target_url = match request.target()? {
        RenderTarget::Url(url) => {
            _markup_file = None;
            url.to_string()
        }
        RenderTarget::Markup(markup) => {
            let (file, url) = write_markup(markup).await?;
            info!("markup written: {} ms", started.elapsed().as_millis());
            _markup_file = Some(file);
            url
        }
    };

    browser.navigate(&target_url).await?;
    info!("network idle: {} ms", started.elapsed().as_millis());

    browser.scroll_viewport().await?;
    info!("scrolling done: {} ms", started.elapsed().as_millis());

    let outcomes = browser.await_images().await?;
    info!(
        "images settled ({}): {} ms",
        outcomes.len(),
        started.elapsed().as_millis()
    );

    let pdf = browser.print_to_pdf(&request.options).await?;
    let output_file = Builder::new().prefix("paperjet-").suffix(".pdf").tempfile()?;
    tokio::fs::write(output_file.path(), &pdf).await?;
    info!("pdf generated: {} ms", started.elapsed().as_millis());

    // Close before reading back so the engine has fully flushed.
    browser.close().await?;
    let bytes = tokio::fs::read(output_file.path()).await?;
    info!(
        "pdf read ({} bytes): {} ms",
        bytes.len(),
        started.elapsed().as_millis()
    );

    if let Some((bucket, key)) = request.destination() {
        let client = storage::client(&config.region).await;
        storage::put_object(&client, bucket, key, bytes, PDF_CONTENT_TYPE).await?;
        info!("pdf uploaded: {} ms", started.elapsed().as_millis());
        Ok(RenderResponse::Stored {
            url: storage::object_url(bucket, &config.region, key),
        })
    } else {
        Ok(RenderResponse::Document {
            data: encode_inline(&bytes, config.max_inline_bytes)?,
        })
    }
}

/// Persist inline markup to a per-invocation scratch file and return its
/// `file://` URL. The file is removed when the guard drops, success or not.
async fn write_markup(markup: &str) -> Result<(NamedTempFile, String)> {
    let file = Builder::new().prefix("paperjet-").suffix(".html").tempfile()?;
    tokio::fs::write(file.path(), markup).await?;

    let url = Url::from_file_path(file.path())
        .map_err(|_| Error::InvalidRequest("markup scratch path is not absolute".into()))?;
    Ok((file, url.to_string()))
}

fn encode_inline(bytes: &[u8], limit: usize) -> Result<String> {
    if bytes.len() > limit {
        return Err(Error::InlineTooLarge {
            size: bytes.len(),
            limit,
        });
    }
    Ok(BASE64.encode(bytes))
}
