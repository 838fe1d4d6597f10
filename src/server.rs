//! Loopback static file server
//!
//! The slide deck references fonts and images by relative path, which Chrome will not
//! load from `file://` reliably. Serving the deck's directory over HTTP on an
//! ephemeral port gives it a real origin for the duration of one export.

use std::net::SocketAddr;
use std::path::Path;
use axum::Router;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tracing::{debug, error, info};
use url::Url;

use crate::error::{Error, Result};

/// A running server rooted at one directory
pub struct StaticServer {
    addr: SocketAddr,
    base: Url,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl StaticServer {
    /// Serve `root` on `127.0.0.1` with an OS-assigned port
    pub async fn start(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::FileNotFound(root.to_path_buf()));
        }

        let app = Router::new().fallback_service(ServeDir::new(root));

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;

        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let shutdown = async {
                let _ = rx.await;
            };
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!("Static server error: {}", e);
            }
        });

        let base = Url::parse(&format!("http://{}/", addr))?;
        info!("Serving {} at {}", root.display(), base);

        Ok(Self {
            addr,
            base,
            shutdown: Some(tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// URL of `file`, given relative to the served root
    pub fn url_for(&self, file: &str) -> Result<Url> {
        Ok(self.base.join(file.trim_start_matches('/'))?)
    }

    /// Stop accepting connections and wait for the server task to finish
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                debug!("Static server task ended abnormally: {}", e);
            }
        }
        debug!("Static server on {} stopped", self.addr);
    }
}

impl Drop for StaticServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
