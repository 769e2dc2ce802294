use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use tracing::debug;

use super::{LookupEvent, LookupRequest, LookupService};

/// Runs a `LookupService` off the event loop. Requests go in over a
/// channel; completions are drained non-blockingly each tick. The thread
/// exits when the request sender is dropped, and completions sent after
/// the worker handle is gone are discarded.
pub struct LookupWorker {
    request_tx: Sender<LookupRequest>,
    event_rx: Receiver<LookupEvent>,
}

impl LookupWorker {
    pub fn spawn(service: impl LookupService) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<LookupRequest>();
        let (event_tx, event_rx) = mpsc::channel::<LookupEvent>();

        thread::spawn(move || {
            while let Ok(mut request) = request_rx.recv() {
                // A newer settled query supersedes anything still queued.
                while let Ok(newer) = request_rx.try_recv() {
                    debug!(
                        superseded = %request.query,
                        by = %newer.query,
                        "skipping queued lookup"
                    );
                    request = newer;
                }

                debug!(query = %request.query, generation = request.generation, "lookup start");
                let result = service.lookup(&request.query);
                let event = LookupEvent::Finished {
                    generation: request.generation,
                    query: request.query,
                    result,
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self {
            request_tx,
            event_rx,
        }
    }

    pub fn submit(&self, request: LookupRequest) {
        let _ = self.request_tx.send(request);
    }

    pub fn drain_ready(&self) -> Vec<LookupEvent> {
        let mut out = Vec::<LookupEvent>::new();
        loop {
            match self.event_rx.try_recv() {
                Ok(event) => out.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}
