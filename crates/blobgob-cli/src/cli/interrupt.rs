//! Interrupt monitor: Ctrl-C (and SIGTERM on unix) ends the process at once.
//!
//! In-flight downloads are not drained; a file being written may be left truncated.

pub fn spawn_interrupt_monitor() {
    tokio::spawn(async {
        wait_for_interrupt().await;
        tracing::warn!("interrupt received, exiting without waiting for downloads");
        println!("\nExiting...");
        std::process::exit(0);
    });
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn wait_for_interrupt() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => {
            tokio::select! {
                _ = ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        Err(err) => {
            tracing::warn!("cannot listen for SIGTERM: {}", err);
            ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_interrupt() {
    ctrl_c().await;
}
