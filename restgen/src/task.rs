//! Async wrappers used in declaration return types.

use std::future::Future;

use futures::future::BoxFuture;
use tokio::runtime::{Builder, Handle, RuntimeFlavor};

use crate::error::ClientError;

/// A boxed, `Send` request future.
///
/// Declaring `-> Task<'_, T>` makes the generated method return a future
/// that already carries [`ClientError`], so no error type is needed in the
/// signature. `Task<'_>` is a request whose response body is ignored.
pub type Task<'a, T = ()> = BoxFuture<'a, Result<T, ClientError>>;

/// Drives a request future to completion from synchronous code.
///
/// Inside a multi-threaded tokio runtime the current worker is handed over
/// with `block_in_place`; outside any runtime a current-thread runtime is
/// started for the call.
///
/// ## Errors
///
/// Returns [`ClientError::Runtime`] if a runtime cannot be started, or when
/// called from a current-thread runtime, which cannot block.
pub fn block_on<F, T>(future: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(|| handle.block_on(future))
        }
        Ok(_) => Err(ClientError::Runtime(std::io::Error::other(
            "blocking client call on a current-thread runtime",
        ))),
        Err(_) => Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(future),
    }
}
