use std::thread;

use futures::future::Future;

/// Runs `future` to completion on a new thread with its own current-thread runtime.
pub(crate) fn spawn_blocking<T: Send + 'static>(
    future: impl Future<Output = T> + Send + 'static,
) -> thread::JoinHandle<Option<T>> {
    thread::spawn(move || {
        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => Some(runtime.block_on(future)),
            Err(e) => {
                tracing::error!("failed to build runtime: {e}");
                None
            }
        }
    })
}

pub(crate) fn r2r_error(context: &str, e: r2r::Error) -> mission_arci::Error {
    mission_arci::Error::Connection {
        message: format!("{context}: {e:?}"),
    }
}
