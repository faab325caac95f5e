// Signal handling module
//
// SIGTERM and SIGINT (Ctrl+C) both request a graceful shutdown.
// Other platforms only get Ctrl+C.

use crate::logger;

/// Resolve once a shutdown signal arrives.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            logger::log_warning(&format!("Failed to register SIGTERM handler: {e}"));
            return ctrl_c().await;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => logger::write_info("\n[SIGNAL] SIGTERM received, shutting down"),
        () = ctrl_c() => {}
    }
}

/// Resolve once Ctrl+C is pressed.
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logger::write_info("\n[SIGNAL] SIGINT received, shutting down"),
        Err(e) => {
            // Without a handler the server can only be killed; keep serving.
            logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
            std::future::pending::<()>().await;
        }
    }
}
