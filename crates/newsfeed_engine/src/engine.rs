use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use newsfeed_core::{FeedRequest, FeedResult, RequestId};
use newsfeed_logging::feed_error;

use crate::source::FeedSource;
use crate::EngineEvent;

enum EngineCommand {
    Fetch {
        request_id: RequestId,
        request: FeedRequest,
    },
}

/// Runs fetches on a background tokio runtime. Each fetch is its own task,
/// so a slow request never delays a newer one; completions come back in
/// whatever order they finish.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    feed_error!("Failed to start fetch runtime: {}", err);
                    fail_all(cmd_rx, event_tx, &err.to_string());
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let source = source.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(source.as_ref(), command, event_tx).await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn fetch(&self, request_id: RequestId, request: FeedRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Fetch {
            request_id,
            request,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    source: &dyn FeedSource,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Fetch {
            request_id,
            request,
        } => {
            let result = source.fetch(&request).await;
            let _ = event_tx.send(EngineEvent::FeedLoaded { request_id, result });
        }
    }
}

// Without a runtime nothing can be fetched; answer every request with an
// error so callers do not sit in Loading forever.
fn fail_all(
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
    reason: &str,
) {
    while let Ok(EngineCommand::Fetch { request_id, .. }) = cmd_rx.recv() {
        let _ = event_tx.send(EngineEvent::FeedLoaded {
            request_id,
            result: FeedResult::failed(format!("fetch runtime unavailable: {reason}")),
        });
    }
}
