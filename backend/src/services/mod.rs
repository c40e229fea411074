//! HTTP surface of the backend.
//!
//! Handlers are thin: they check the caller's role, hand the store work to
//! [`run_blocking`] and shape the reply. All failures leave through `AppError`.

pub mod entities;
pub mod health;
pub mod work_log;

use crate::error::AppResult;

/// Runs synchronous store work on tokio's blocking pool.
pub(crate) async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}
