//! Run blocking filesystem work from async tool handlers.

use crate::Error;

/// Execute a blocking closure on Tokio's blocking threadpool.
///
/// The file operations are plain synchronous calls; async [`Tool`]
/// implementations hand them to this helper so a large read or write does
/// not stall the runtime.
///
/// [`Tool`]: crate::Tool
pub async fn run_blocking<F, T>(f: F) -> Result<T, Error>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::tool("blocking", format!("Blocking task failed: {}", e)))
}
