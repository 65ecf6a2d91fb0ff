//! Upload progress reporting.
//!
//! The request body is streamed in chunks; each chunk handed to the
//! transport advances `loaded`. Once the upload call settles the tracker is
//! closed and later chunks (if any) report nothing.

use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use serde::Serialize;

/// Bytes per streamed body chunk.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// One progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UploadProgress {
    pub loaded: u64,
    pub total: u64,
    /// `round(loaded / total * 100)`.
    pub percentage: u8,
}

impl UploadProgress {
    /// Returns `None` when the total length is unknown (zero).
    pub fn new(loaded: u64, total: u64) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let percentage = ((loaded as f64 / total as f64) * 100.0).round().min(100.0) as u8;
        Some(Self {
            loaded,
            total,
            percentage,
        })
    }
}

/// Callback invoked with each progress event.
pub type ProgressCallback = Arc<dyn Fn(UploadProgress) + Send + Sync>;

/// Forwards progress to an optional callback until closed.
///
/// The settled flag is held locked while the callback runs, so `close`
/// waits for an in-flight callback and none starts after it returns.
/// Callbacks must not call back into the tracker.
#[derive(Clone)]
pub struct ProgressTracker {
    callback: Option<ProgressCallback>,
    settled: Arc<Mutex<bool>>,
}

impl ProgressTracker {
    pub fn new(callback: Option<ProgressCallback>) -> Self {
        Self {
            callback,
            settled: Arc::new(Mutex::new(false)),
        }
    }

    /// Reports progress unless the upload already settled.
    pub fn report(&self, loaded: u64, total: u64) {
        let (Some(callback), Some(progress)) = (&self.callback, UploadProgress::new(loaded, total))
        else {
            return;
        };
        let settled = self.settled.lock().unwrap_or_else(PoisonError::into_inner);
        if !*settled {
            callback(progress);
        }
    }

    /// Marks the upload as settled. No callbacks fire afterwards.
    pub fn close(&self) {
        *self.settled.lock().unwrap_or_else(PoisonError::into_inner) = true;
    }

    pub fn is_closed(&self) -> bool {
        *self.settled.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Splits file bytes into chunks that report progress as they are pulled.
/// Chunks are slices of `data`; nothing is copied.
pub fn progress_chunks(
    data: Bytes,
    tracker: ProgressTracker,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + Sync + 'static {
    let total = data.len();
    let chunks: Vec<Bytes> = (0..total)
        .step_by(CHUNK_SIZE)
        .map(|start| data.slice(start..(start + CHUNK_SIZE).min(total)))
        .collect();
    let mut loaded = 0u64;
    stream::iter(chunks).map(move |chunk| {
        loaded += chunk.len() as u64;
        tracker.report(loaded, total as u64);
        Ok(chunk)
    })
}

/// Wraps file bytes in a streaming request body that reports progress.
pub fn progress_body(data: Bytes, tracker: ProgressTracker) -> reqwest::Body {
    reqwest::Body::wrap_stream(progress_chunks(data, tracker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    fn recording() -> (ProgressCallback, Arc<Mutex<Vec<UploadProgress>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let callback: ProgressCallback = Arc::new(move |p: UploadProgress| sink.lock().unwrap().push(p));
        (callback, events)
    }

    #[test]
    fn test_percentages() {
        let (callback, events) = recording();
        let tracker = ProgressTracker::new(Some(callback));
        tracker.report(500, 1000);
        tracker.report(1000, 1000);

        let percentages: Vec<u8> = events.lock().unwrap().iter().map(|p| p.percentage).collect();
        assert_eq!(percentages, vec![50, 100]);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(UploadProgress::new(1, 3).unwrap().percentage, 33);
        assert_eq!(UploadProgress::new(2, 3).unwrap().percentage, 67);
        assert_eq!(UploadProgress::new(5, 0), None);
    }

    #[test]
    fn test_unknown_total_reports_nothing() {
        let (callback, events) = recording();
        let tracker = ProgressTracker::new(Some(callback));
        tracker.report(10, 0);
        assert!(events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_no_reports_after_close() {
        let (callback, events) = recording();
        let tracker = ProgressTracker::new(Some(callback));
        tracker.report(1, 4);
        tracker.close();
        tracker.report(4, 4);
        assert_eq!(events.lock().unwrap().len(), 1);
        assert!(tracker.is_closed());
    }

    #[tokio::test]
    async fn test_chunks_share_the_file_buffer() {
        let data = Bytes::from(vec![1u8; CHUNK_SIZE + 1]);
        let base = data.as_ptr() as usize;
        let chunks: Vec<Bytes> = progress_chunks(data, ProgressTracker::new(None))
            .map(|c| c.unwrap())
            .collect()
            .await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].as_ptr() as usize, base);
        assert_eq!(chunks[1].as_ptr() as usize, base + CHUNK_SIZE);
        assert_eq!(chunks[1].len(), 1);
    }

    #[test]
    fn test_close_waits_for_running_callback() {
        let entered = Arc::new(Barrier::new(2));
        let finished = Arc::new(AtomicBool::new(false));
        let (gate, done) = (Arc::clone(&entered), Arc::clone(&finished));
        let callback: ProgressCallback = Arc::new(move |_: UploadProgress| {
            gate.wait();
            thread::sleep(Duration::from_millis(50));
            done.store(true, Ordering::SeqCst);
        });
        let tracker = ProgressTracker::new(Some(callback));

        let reporter = tracker.clone();
        let handle = thread::spawn(move || reporter.report(1, 2));
        entered.wait();
        tracker.close();
        assert!(finished.load(Ordering::SeqCst));

        // Would block on the barrier if the callback ran again.
        tracker.report(2, 2);
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn test_chunks_report_monotonic_progress() {
        let (callback, events) = recording();
        let tracker = ProgressTracker::new(Some(callback));
        let data = Bytes::from(vec![7u8; CHUNK_SIZE * 2 + 10]);

        let mut chunks = Box::pin(progress_chunks(data, tracker));
        let mut received = 0usize;
        while let Some(chunk) = chunks.next().await {
            received += chunk.unwrap().len();
        }
        assert_eq!(received, CHUNK_SIZE * 2 + 10);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.windows(2).all(|w| w[0].loaded <= w[1].loaded));
        assert_eq!(events.last().unwrap().percentage, 100);
    }

    #[tokio::test]
    async fn test_empty_body_reports_nothing() {
        let (callback, events) = recording();
        let mut chunks = Box::pin(progress_chunks(Bytes::new(), ProgressTracker::new(Some(callback))));
        assert!(chunks.next().await.is_none());
        assert!(events.lock().unwrap().is_empty());
    }
}
