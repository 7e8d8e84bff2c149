//! Async facade over the synchronous Chrome session

use std::sync::mpsc::{self, Sender};
use std::thread;

use tokio::sync::oneshot;

use crate::chrome::{ChromeSession, ImageOutcome};
use crate::options::PdfOptions;
use crate::{Error, RenderConfig, Result};

enum Command {
    Navigate(String, oneshot::Sender<Result<()>>),
    ScrollViewport(oneshot::Sender<Result<()>>),
    AwaitImages(oneshot::Sender<Result<Vec<ImageOutcome>>>),
    PrintToPdf(Box<PdfOptions>, oneshot::Sender<Result<Vec<u8>>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async handle to a browser backed by a dedicated worker thread.
///
/// The worker thread owns a synchronous [`ChromeSession`] and executes
/// commands sent from async tasks, so the pipeline can await browser work
/// without blocking the runtime or requiring the session to be `Send`.
pub struct Browser {
    cmd_tx: Sender<Command>,
}

impl Browser {
    /// Launch a browser (spawns the worker thread that owns the session).
    pub async fn launch(config: RenderConfig) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();

        thread::spawn(move || {
            // Launch on the worker thread
            let session = match ChromeSession::launch(config) {
                Ok(s) => s,
                Err(err) => {
                    let _ = init_tx.send(Err(err));
                    return;
                }
            };

            let _ = init_tx.send(Ok(()));

            // Command loop
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Navigate(url, resp) => {
                        let _ = resp.send(session.navigate(&url));
                    }
                    Command::ScrollViewport(resp) => {
                        let _ = resp.send(session.scroll_viewport());
                    }
                    Command::AwaitImages(resp) => {
                        let _ = resp.send(session.await_images());
                    }
                    Command::PrintToPdf(options, resp) => {
                        let _ = resp.send(session.print_to_pdf(&options));
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(session.close());
                        break;
                    }
                }
            }
        });

        // Wait for the worker to report launch success or failure
        let init_res = init_rx
            .await
            .map_err(|e| Error::Worker(format!("Launch canceled: {}", e)))?;
        init_res?;

        Ok(Self { cmd_tx })
    }

    /// Navigate to a URL and wait for network quiescence.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Navigate(url.to_string(), tx));
        rx.await
            .map_err(|e| Error::Worker(format!("Navigate canceled: {}", e)))?
    }

    /// Scroll one viewport height to trigger lazy loading.
    pub async fn scroll_viewport(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::ScrollViewport(tx));
        rx.await
            .map_err(|e| Error::Worker(format!("Scroll canceled: {}", e)))?
    }

    /// Wait for every image on the page to settle; returns the outcomes.
    pub async fn await_images(&self) -> Result<Vec<ImageOutcome>> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::AwaitImages(tx));
        rx.await
            .map_err(|e| Error::Worker(format!("Image wait canceled: {}", e)))?
    }

    /// Print the current page to PDF and return the bytes.
    pub async fn print_to_pdf(&self, options: &PdfOptions) -> Result<Vec<u8>> {
        let (tx, rx) = oneshot::channel();
        let _ = self
            .cmd_tx
            .send(Command::PrintToPdf(Box::new(options.clone()), tx));
        rx.await
            .map_err(|e| Error::Worker(format!("Print canceled: {}", e)))?
    }

    /// Shut down the worker and terminate the browser process.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Worker(format!("Close canceled: {}", e)))?
    }
}
