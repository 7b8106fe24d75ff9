//! Upload progress reporting for multipart submissions.
//!
//! The payload is streamed to the server in fixed-size chunks; after each
//! chunk the observer is told the percentage of bytes handed to the
//! transport. Progress is derived from bytes sent over total bytes, so the
//! reported values are monotonically non-decreasing and reach 100 exactly
//! when the last chunk is dispatched.

use futures_util::stream::{self, Stream, StreamExt};
use std::convert::Infallible;

/// Chunk size for streaming the payload body.
const CHUNK_SIZE: usize = 64 * 1024;

/// Wraps a payload in a byte stream that reports upload progress.
///
/// The observer receives percentages in 0–100, invoked once per distinct
/// value. For an empty payload the total is unusable and the observer is
/// never invoked.
pub fn chunked_with_progress<F>(
    payload: Vec<u8>,
    on_progress: F,
) -> impl Stream<Item = Result<Vec<u8>, Infallible>> + Send
where
    F: Fn(u8) + Send + 'static,
{
    let total = payload.len();
    let chunks: Vec<Vec<u8>> = payload
        .chunks(CHUNK_SIZE)
        .map(|chunk| chunk.to_vec())
        .collect();

    let mut sent = 0usize;
    let mut last_reported: Option<u8> = None;

    stream::iter(chunks).map(move |chunk| {
        sent += chunk.len();
        if total > 0 {
            let percent = ((sent as u64 * 100) / total as u64) as u8;
            if last_reported != Some(percent) {
                on_progress(percent);
                last_reported = Some(percent);
            }
        }
        Ok(chunk)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use std::sync::{Arc, Mutex};

    async fn drain<F>(payload: Vec<u8>, on_progress: F) -> Vec<Vec<u8>>
    where
        F: Fn(u8) + Send + 'static,
    {
        chunked_with_progress(payload, on_progress)
            .map(|chunk| chunk.unwrap())
            .collect()
            .await
    }

    fn recorder() -> (Arc<Mutex<Vec<u8>>>, impl Fn(u8) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |p| sink.lock().unwrap().push(p))
    }

    #[tokio::test]
    async fn progress_is_monotonic_and_ends_at_100() {
        let (seen, observer) = recorder();
        // Multiple chunks: just over three chunk sizes
        let payload = vec![0u8; CHUNK_SIZE * 3 + 17];
        let chunks = drain(payload.clone(), observer).await;

        let total: usize = chunks.iter().map(|c| c.len()).sum();
        assert_eq!(total, payload.len());

        let seen = seen.lock().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*seen.last().unwrap(), 100);
        assert!(seen.iter().all(|&p| p <= 100));
    }

    #[tokio::test]
    async fn small_payload_reports_100_once() {
        let (seen, observer) = recorder();
        drain(vec![1, 2, 3], observer).await;
        assert_eq!(*seen.lock().unwrap(), vec![100]);
    }

    #[tokio::test]
    async fn empty_payload_skips_progress() {
        let (seen, observer) = recorder();
        let chunks = drain(Vec::new(), observer).await;
        assert!(chunks.is_empty());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_percentages_are_not_repeated() {
        let (seen, observer) = recorder();
        // Many chunks mapping onto 100 distinct percentages at most
        let payload = vec![0u8; CHUNK_SIZE * 7];
        drain(payload, observer).await;

        let seen = seen.lock().unwrap();
        let mut deduped = seen.clone();
        deduped.dedup();
        assert_eq!(*seen, deduped);
    }
}
