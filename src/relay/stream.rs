use std::pin::Pin;
use std::task::{ Context, Poll };

use axum::body::Bytes;
use futures::{ Stream, StreamExt };
use log::{ debug, error, warn };
use uuid::Uuid;

type UpstreamBytes = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Streaming,
    Finished,
    Interrupted,
}

/// Pass-through body for a relayed reply.
///
/// Chunks are yielded exactly as the upstream produces them and only when
/// the outbound body is polled, so the caller's read pace bounds how fast the
/// upstream is read. Dropping the stream early drops the upstream response
/// and closes that connection.
///
/// Once the response headers have been sent there is no way to report a
/// failure to the client other than cutting the body short, so upstream
/// errors here are logged and forwarded as a body error, which aborts the
/// outbound response.
pub struct RelayStream {
    inner: UpstreamBytes,
    request_id: Uuid,
    bytes: u64,
    chunks: u64,
    state: State,
}

impl RelayStream {
    pub fn new<S>(inner: S, request_id: Uuid) -> Self
        where S: Stream<Item = Result<Bytes, reqwest::Error>> + Send + 'static
    {
        Self {
            inner: Box::pin(inner),
            request_id,
            bytes: 0,
            chunks: 0,
            state: State::Streaming,
        }
    }
}

impl Stream for RelayStream {
    type Item = Result<Bytes, reqwest::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.state != State::Streaming {
            return Poll::Ready(None);
        }

        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.bytes += chunk.len() as u64;
                this.chunks += 1;
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                this.state = State::Interrupted;
                error!(
                    "[{}] Upstream stream interrupted after {} bytes in {} chunks: {}",
                    this.request_id,
                    this.bytes,
                    this.chunks,
                    e
                );
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                this.state = State::Finished;
                debug!(
                    "[{}] Upstream stream finished: {} bytes in {} chunks",
                    this.request_id,
                    this.bytes,
                    this.chunks
                );
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for RelayStream {
    fn drop(&mut self) {
        if self.state == State::Streaming {
            warn!(
                "[{}] Client went away after {} bytes; closing upstream connection",
                self.request_id,
                self.bytes
            );
        }
    }
}
