//! Bridges a workflow invocation into a consumable event stream.
//!
//! The graph runs on a background task while a forwarder relays its
//! progress events in production order. The consumer always sees a
//! terminal event, observed or synthesized.

use std::sync::Arc;
use std::time::Duration;

use chatflow_core::prelude::{ChatState, CompiledGraph, EventSink, ProgressEvent, RunConfig};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the workflow in the background and stream its progress events.
///
/// Events arrive strictly in the order nodes emitted them. The stream
/// ends after the first terminal event: either one the workflow emitted,
/// a synthesized end on quiet completion, or a single error event when
/// the background task fails. Dropping the stream does not cancel the
/// workflow.
pub fn stream_workflow(
    graph: Arc<CompiledGraph>,
    state: ChatState,
    config: RunConfig,
    capacity: usize,
) -> ReceiverStream<ProgressEvent> {
    let (sink, events) = EventSink::channel(capacity);
    let state = state.with_events(sink);
    let (out_tx, out_rx) = mpsc::channel(capacity.max(1));

    tokio::spawn(forward_events(graph, state, config, events, out_tx));
    ReceiverStream::new(out_rx)
}

async fn forward_events(
    graph: Arc<CompiledGraph>,
    state: ChatState,
    config: RunConfig,
    mut events: mpsc::Receiver<ProgressEvent>,
    out: mpsc::Sender<ProgressEvent>,
) {
    let workflow = tokio::spawn(async move { graph.invoke(state, &config).await });

    let mut saw_terminal = false;
    while !saw_terminal {
        match tokio::time::timeout(POLL_INTERVAL, events.recv()).await {
            Ok(Some(event)) => {
                saw_terminal = event.kind.is_terminal();
                if out.send(event).await.is_err() {
                    debug!("event consumer went away");
                    return;
                }
            }
            // all sink handles dropped, so the workflow is winding down
            Ok(None) => break,
            Err(_) => {
                if workflow.is_finished() {
                    break;
                }
            }
        }
    }

    // forward whatever was queued before the workflow stopped
    while !saw_terminal {
        match events.try_recv() {
            Ok(event) => {
                saw_terminal = event.kind.is_terminal();
                if out.send(event).await.is_err() {
                    return;
                }
            }
            Err(_) => break,
        }
    }

    if saw_terminal {
        // the workflow keeps running detached if it has work left
        return;
    }

    let closing = match workflow.await {
        Ok(Ok(state)) => {
            debug!(
                status = state.processing_status.as_deref().unwrap_or(""),
                "workflow completed without explicit terminal event"
            );
            ProgressEvent::end("")
        }
        Ok(Err(err)) => {
            warn!(%err, "workflow failed");
            ProgressEvent::error(err.to_string())
        }
        Err(err) => {
            warn!(%err, "workflow task panicked or was cancelled");
            ProgressEvent::error(format!("workflow execution failed: {err}"))
        }
    };
    let _ = out.send(closing).await;
}
