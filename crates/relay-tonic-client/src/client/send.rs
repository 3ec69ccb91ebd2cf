//! Outbound request body streamer.

use crate::pool::RunnerCall;
use bytes::Bytes;
use relay_tonic_core::{MAX_DATA_CHUNK, proto::ClientMsg, proto::DataFrame, proto::client_msg};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;

fn data_frame(data: Bytes, eof: bool) -> ClientMsg {
    ClientMsg {
        body: Some(client_msg::Body::Data(DataFrame { data, eof })),
    }
}

/// Stream the call's request body onto the engagement as data frames.
///
/// Reads the body in [`MAX_DATA_CHUNK`] chunks and terminates with an
/// empty end-of-stream frame, so the runner always observes a
/// terminating frame. A body read error loses the remaining bytes but
/// still produces the terminating frame. Send failures are not
/// surfaced here: the outbound channel only dies once the transport
/// tore the stream down, and the receive side owns failure reporting.
///
/// Runs as an independent task; it terminates on its own once it
/// observes end-of-stream in either direction.
pub(crate) async fn send_to_runner(
    tx: mpsc::Sender<ClientMsg>,
    call: Arc<dyn RunnerCall>,
    runner_addr: String,
) {
    let mut body = call.request_body();
    let mut buffer = vec![0u8; MAX_DATA_CHUNK];

    loop {
        let (len, eof) = match body.read(&mut buffer).await {
            Ok(0) => (0, true),
            Ok(len) => (len, false),
            Err(err) => {
                // Data loss: whatever the body held past this point
                // never reaches the runner.
                tracing::error!(
                    runner_addr = %runner_addr,
                    error = %err,
                    "failed to read request body"
                );
                (0, true)
            }
        };

        tracing::debug!(runner_addr = %runner_addr, len, eof, "sending data frame to runner");
        let frame = data_frame(Bytes::copy_from_slice(&buffer[..len]), eof);
        if tx.send(frame).await.is_err() {
            // Usually a runner rejection that already closed the
            // stream; the receive side reports it.
            tracing::debug!(
                runner_addr = %runner_addr,
                "stream closed before request body was fully sent"
            );
            return;
        }
        if eof {
            return;
        }
    }
}
