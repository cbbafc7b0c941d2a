//! Device position subscriptions.
//!
//! A [`PositionSource`] hands out a [`PositionWatch`]: a continuous stream of
//! readings backed by a background task. Dropping the watch aborts the task,
//! which is the equivalent of clearing a platform-level watch.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use medspa_core::Coordinate;

use crate::error::GeolocationError;

const READING_BUFFER: usize = 8;

/// Acquisition settings passed to the position source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// Ask the platform for its most accurate fix.
    pub high_accuracy: bool,
    /// Oldest cached reading that may be delivered. Zero means always
    /// acquire a fresh fix.
    pub maximum_age: Duration,
    /// Longest wait for each reading before reporting a timeout.
    pub timeout: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            maximum_age: Duration::ZERO,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionReading {
    pub coordinate: Coordinate,
    /// Reported accuracy radius in meters, when the source provides one.
    pub accuracy_m: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl PositionReading {
    /// Whether this reading is no older than `maximum_age` at `now`.
    #[must_use]
    pub fn is_fresh(&self, maximum_age: Duration, now: DateTime<Utc>) -> bool {
        let Ok(max_age) = chrono::Duration::from_std(maximum_age) else {
            return true;
        };
        now.signed_duration_since(self.timestamp) <= max_age
    }
}

pub type ReadingResult = Result<PositionReading, GeolocationError>;

/// An active position subscription.
///
/// Yields readings until the source closes. Dropping it releases the
/// subscription.
#[derive(Debug)]
pub struct PositionWatch {
    readings: mpsc::Receiver<ReadingResult>,
    task: Option<JoinHandle<()>>,
}

impl PositionWatch {
    #[must_use]
    pub fn new(readings: mpsc::Receiver<ReadingResult>, task: JoinHandle<()>) -> Self {
        Self {
            readings,
            task: Some(task),
        }
    }

    /// A watch fed directly by a channel, with no background task to stop.
    #[must_use]
    pub fn from_receiver(readings: mpsc::Receiver<ReadingResult>) -> Self {
        Self {
            readings,
            task: None,
        }
    }

    /// Wait for the next reading or error. `None` once the source is closed.
    pub async fn next(&mut self) -> Option<ReadingResult> {
        self.readings.recv().await
    }
}

impl Drop for PositionWatch {
    fn drop(&mut self) {
        self.readings.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Something that can deliver continuous device positions.
pub trait PositionSource: Send + Sync {
    /// Start a new subscription.
    ///
    /// # Errors
    ///
    /// Returns [`GeolocationError::Unsupported`] if the platform has no
    /// positioning capability.
    fn watch(&self, options: WatchOptions) -> Result<PositionWatch, GeolocationError>;
}

/// For platforms with no positioning capability.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedPositionSource;

impl PositionSource for UnsupportedPositionSource {
    fn watch(&self, _options: WatchOptions) -> Result<PositionWatch, GeolocationError> {
        Err(GeolocationError::Unsupported)
    }
}

/// Reads `lat,lng[,accuracy_m]` lines from an async reader such as stdin or
/// a GPS bridge pipe.
///
/// Blank lines and lines starting with `#` are ignored. Each reading must
/// arrive within the watch timeout or a [`GeolocationError::Timeout`] is
/// emitted and the watch keeps waiting.
pub struct LinePositionSource<R> {
    reader: Arc<Mutex<R>>,
    last_known: Arc<std::sync::Mutex<Option<PositionReading>>>,
}

impl<R> LinePositionSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader: Arc::new(Mutex::new(reader)),
            last_known: Arc::new(std::sync::Mutex::new(None)),
        }
    }

    fn cached_reading(&self, maximum_age: Duration) -> Option<PositionReading> {
        if maximum_age.is_zero() {
            return None;
        }
        let guard = self.last_known.lock().ok()?;
        guard
            .as_ref()
            .filter(|r| r.is_fresh(maximum_age, Utc::now()))
            .cloned()
    }
}

impl<R> PositionSource for LinePositionSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn watch(&self, options: WatchOptions) -> Result<PositionWatch, GeolocationError> {
        let (tx, rx) = mpsc::channel(READING_BUFFER);

        if let Some(cached) = self.cached_reading(options.maximum_age) {
            // Fresh channel with spare capacity, so this cannot fail.
            let _ = tx.try_send(Ok(cached));
        }

        let reader = Arc::clone(&self.reader);
        let last_known = Arc::clone(&self.last_known);
        tracing::debug!(
            high_accuracy = options.high_accuracy,
            timeout_secs = options.timeout.as_secs(),
            "position watch started"
        );

        let task = tokio::spawn(async move {
            let mut reader = reader.lock().await;
            // Only cleared after a full line, so a timeout mid-line keeps
            // the partial bytes for the next read.
            let mut line = String::new();
            loop {
                let item = match tokio::time::timeout(options.timeout, reader.read_line(&mut line))
                    .await
                {
                    Err(_) => Err(GeolocationError::Timeout(options.timeout)),
                    Ok(Err(e)) => Err(GeolocationError::Platform(e.to_string())),
                    Ok(Ok(0)) => break,
                    Ok(Ok(_)) => {
                        let trimmed = line.trim().to_owned();
                        line.clear();
                        if trimmed.is_empty() || trimmed.starts_with('#') {
                            continue;
                        }
                        parse_position_line(&trimmed)
                    }
                };

                if let Ok(reading) = &item {
                    if let Ok(mut guard) = last_known.lock() {
                        *guard = Some(reading.clone());
                    }
                }
                if tx.send(item).await.is_err() {
                    break;
                }
            }
            tracing::debug!("position source closed");
        });

        Ok(PositionWatch::new(rx, task))
    }
}

/// Parse a `lat,lng[,accuracy_m]` line into a reading stamped now.
///
/// # Errors
///
/// Returns [`GeolocationError::Platform`] for malformed or out-of-range input.
pub fn parse_position_line(line: &str) -> ReadingResult {
    let malformed = || GeolocationError::Platform(format!("malformed position line '{line}'"));

    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(malformed());
    }

    let latitude: f64 = parts[0].parse().map_err(|_| malformed())?;
    let longitude: f64 = parts[1].parse().map_err(|_| malformed())?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(GeolocationError::Platform(format!(
            "position out of range: {latitude},{longitude}"
        )));
    }

    let accuracy_m = match parts.get(2) {
        Some(raw) => {
            let value: f64 = raw.parse().map_err(|_| malformed())?;
            if !value.is_finite() || value < 0.0 {
                return Err(malformed());
            }
            Some(value)
        }
        None => None,
    };

    Ok(PositionReading {
        coordinate: Coordinate::new(latitude, longitude),
        accuracy_m,
        timestamp: Utc::now(),
    })
}
