// Location: src/processing/stream.rs

use std::ops::Range;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use futures::future::BoxFuture;
use futures::stream::{self, BoxStream, Stream};
use tracing::debug;

use crate::{
    error::Result,
    metrics::MetricsCollector,
    model::SimulationRng,
};

/// Pseudo-stream of growing response prefixes.
///
/// The full response is produced on the first poll, then re-emitted word by
/// word. Dropping the stream is the only way to cancel it.
pub struct ResponseStream {
    inner: BoxStream<'static, Result<String>>,
}

enum StreamState {
    Pending(BoxFuture<'static, Result<String>>),
    Emitting { full: String, word_ends: Vec<usize>, emitted: usize },
    Done,
}

/// Shared pieces a stream needs while emitting
#[derive(Clone)]
pub(crate) struct StreamContext {
    pub rng: Arc<SimulationRng>,
    pub step: Range<Duration>,
    pub metrics: Arc<MetricsCollector>,
}

impl ResponseStream {
    pub(crate) fn new(response: BoxFuture<'static, Result<String>>, context: StreamContext) -> Self {
        let inner = stream::unfold(StreamState::Pending(response), move |state| {
            let context = context.clone();
            async move {
                match state {
                    StreamState::Pending(response) => match response.await {
                        Ok(full) => {
                            let word_ends = word_ends(&full);
                            debug!(words = word_ends.len(), "Streaming simulated response");
                            Self::emit(full, word_ends, 0, &context).await
                        }
                        Err(e) => Some((Err(e), StreamState::Done)),
                    },
                    StreamState::Emitting { full, word_ends, emitted } => {
                        Self::emit(full, word_ends, emitted, &context).await
                    }
                    StreamState::Done => None,
                }
            }
        });

        Self {
            inner: Box::pin(inner),
        }
    }

    async fn emit(
        full: String,
        word_ends: Vec<usize>,
        emitted: usize,
        context: &StreamContext,
    ) -> Option<(Result<String>, StreamState)> {
        if emitted >= word_ends.len() {
            return None;
        }

        tokio::time::sleep(context.rng.delay_in(context.step.clone())).await;

        let prefix = full[..word_ends[emitted]].to_string();
        context.metrics.record_stream_chunk().await;

        Some((Ok(prefix), StreamState::Emitting { full, word_ends, emitted: emitted + 1 }))
    }
}

/// Byte offsets where each whitespace-separated word ends.
///
/// The last offset is stretched to `text.len()` so the final prefix is the
/// whole text, trailing whitespace included.
fn word_ends(text: &str) -> Vec<usize> {
    let mut ends = Vec::new();
    let mut in_word = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if in_word {
                ends.push(i);
                in_word = false;
            }
        } else {
            in_word = true;
        }
    }
    if in_word {
        ends.push(text.len());
    }
    if let Some(last) = ends.last_mut() {
        *last = text.len();
    }
    ends
}

impl Stream for ResponseStream {
    type Item = Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for ResponseStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseStream").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use futures::{FutureExt, StreamExt};
    use tokio::time::Instant;

    fn test_context() -> StreamContext {
        StreamContext {
            rng: Arc::new(SimulationRng::seeded(3)),
            step: Duration::from_millis(150)..Duration::from_millis(250),
            metrics: Arc::new(MetricsCollector::new()),
        }
    }

    fn ready(text: &str) -> BoxFuture<'static, Result<String>> {
        let text = text.to_string();
        async move { Ok(text) }.boxed()
    }

    #[tokio::test(start_paused = true)]
    async fn test_prefixes_grow_word_by_word() {
        let context = test_context();
        let stream = ResponseStream::new(ready("one two three"), context.clone());
        let chunks: Vec<String> = stream.map(|c| c.unwrap()).collect().await;

        assert_eq!(chunks, vec!["one", "one two", "one two three"]);
        assert_eq!(context.metrics.snapshot().await.stream_chunks, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_step_delays_within_bounds() {
        let mut stream = ResponseStream::new(ready("a b c d"), test_context());
        let mut last = Instant::now();
        while let Some(chunk) = stream.next().await {
            chunk.unwrap();
            let waited = last.elapsed();
            assert!(waited >= Duration::from_millis(150) && waited < Duration::from_millis(250));
            last = Instant::now();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_irregular_whitespace_yields_one_chunk_per_word() {
        let text = "Tell me\nabout  tabs\tand lines";
        let stream = ResponseStream::new(ready(text), test_context());
        let chunks: Vec<String> = stream.map(|c| c.unwrap()).collect().await;

        assert_eq!(chunks.len(), text.split_whitespace().count());
        assert_eq!(
            chunks,
            vec![
                "Tell",
                "Tell me",
                "Tell me\nabout",
                "Tell me\nabout  tabs",
                "Tell me\nabout  tabs\tand",
                "Tell me\nabout  tabs\tand lines",
            ]
        );
    }

    #[test]
    fn test_word_ends() {
        assert_eq!(word_ends("one two"), vec![3, 7]);
        assert_eq!(word_ends("  lead and trail  "), vec![6, 10, 18]);
        assert_eq!(word_ends("héllo wörld"), vec![6, 13]);
        assert!(word_ends(" \n\t").is_empty());
        assert!(word_ends("").is_empty());
    }

    #[tokio::test]
    async fn test_error_ends_stream() {
        let failing = async { Err(ServiceError::NotLoaded { operation: "generate_stream" }) }.boxed();
        let mut stream = ResponseStream::new(failing, test_context());

        let first = stream.next().await.unwrap();
        assert!(first.unwrap_err().is_not_loaded());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_drop() {
        let context = test_context();
        let mut stream = ResponseStream::new(ready("w x y z"), context.clone());
        assert_eq!(stream.next().await.unwrap().unwrap(), "w");
        drop(stream);
        assert_eq!(context.metrics.snapshot().await.stream_chunks, 1);
    }
}
