use crate::core::gate::{self, GateDecision};
use crate::domain::model::RigSnapshot;
use crate::domain::ports::{RadioSource, StatusSink};
use crate::utils::error::{ErrorCategory, ErrorSeverity, RelayError};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// What a single poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    ReadFailed(ErrorCategory),
    Unchanged,
    Forwarded,
    ForwardFailed,
}

/// Reads the radio on a fixed cadence and forwards state changes.
///
/// The last successfully forwarded snapshot is the only state carried
/// between cycles; it advances only when a forward succeeds.
pub struct PollLoop<S: RadioSource, F: StatusSink> {
    source: S,
    sink: F,
    interval: Duration,
    last_forwarded: Option<RigSnapshot>,
}

impl<S: RadioSource, F: StatusSink> PollLoop<S, F> {
    pub fn new(source: S, sink: F, interval: Duration) -> Self {
        Self {
            source,
            sink,
            interval,
            last_forwarded: None,
        }
    }

    pub fn last_forwarded(&self) -> Option<&RigSnapshot> {
        self.last_forwarded.as_ref()
    }

    /// Polls forever. The first read happens one interval after start.
    pub async fn run(mut self) {
        info!(
            "Starting polling of {} every {:?}...",
            self.source.describe(),
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;
            self.poll_once().await;
        }
    }

    pub async fn poll_once(&mut self) -> CycleOutcome {
        let current = match self.source.get_data().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log_read_failure(&e);
                return CycleOutcome::ReadFailed(e.category());
            }
        };

        if gate::evaluate(self.last_forwarded.as_ref(), &current) == GateDecision::Skip {
            debug!("Radio data unchanged. Skipping update.");
            return CycleOutcome::Unchanged;
        }

        info!(
            "Radio state changed; freq: {:.0} Hz, mode: {}. Updating Wavelog...",
            current.freq_a, current.mode_a
        );

        match self.sink.forward(&current).await {
            Ok(()) => {
                self.last_forwarded = Some(current);
                debug!("Successfully updated Wavelog.");
                CycleOutcome::Forwarded
            }
            Err(e) => {
                error!("Error posting to Wavelog: {}", e);
                CycleOutcome::ForwardFailed
            }
        }
    }
}

// The daemon may simply not be running yet, so connection failures stay quiet.
fn log_read_failure(err: &RelayError) {
    match err.severity() {
        ErrorSeverity::Low => debug!("Connection error fetching radio data: {}", err),
        ErrorSeverity::Medium => warn!("Error fetching radio data: {}", err),
        ErrorSeverity::High | ErrorSeverity::Critical => {
            error!("Error fetching radio data: {}", err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::Result;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    struct ScriptedSource {
        reads: Mutex<VecDeque<Result<RigSnapshot>>>,
    }

    impl ScriptedSource {
        fn new(reads: Vec<Result<RigSnapshot>>) -> Self {
            Self {
                reads: Mutex::new(reads.into()),
            }
        }
    }

    #[async_trait]
    impl RadioSource for ScriptedSource {
        async fn get_data(&self) -> Result<RigSnapshot> {
            self.reads
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(RelayError::connection("script exhausted")))
        }

        fn describe(&self) -> String {
            "scripted source".to_string()
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        sent: Arc<Mutex<Vec<RigSnapshot>>>,
        failures_left: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl StatusSink for RecordingSink {
        async fn forward(&self, snapshot: &RigSnapshot) -> Result<()> {
            self.sent.lock().unwrap().push(snapshot.clone());
            let mut failures = self.failures_left.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(RelayError::DeliveryError {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    fn snapshot(power: f64) -> RigSnapshot {
        RigSnapshot::single_vfo(14_074_000.0, "DATA", power)
    }

    #[tokio::test]
    async fn test_identical_reads_forward_once() {
        let sink = RecordingSink::default();
        let mut poll = PollLoop::new(
            ScriptedSource::new(vec![Ok(snapshot(50.0)), Ok(snapshot(50.0))]),
            sink.clone(),
            Duration::from_millis(10),
        );

        assert_eq!(poll.poll_once().await, CycleOutcome::Forwarded);
        assert_eq!(poll.poll_once().await, CycleOutcome::Unchanged);
        assert_eq!(sink.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_forward_keeps_baseline() {
        let sink = RecordingSink::default();
        *sink.failures_left.lock().unwrap() = 1;
        let mut poll = PollLoop::new(
            ScriptedSource::new(vec![Ok(snapshot(50.0)), Ok(snapshot(50.0))]),
            sink.clone(),
            Duration::from_millis(10),
        );

        assert_eq!(poll.poll_once().await, CycleOutcome::ForwardFailed);
        assert!(poll.last_forwarded().is_none());

        assert_eq!(poll.poll_once().await, CycleOutcome::Forwarded);
        assert_eq!(poll.last_forwarded(), Some(&snapshot(50.0)));
        assert_eq!(sink.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_read_failure_is_classified_and_skipped() {
        let sink = RecordingSink::default();
        let mut poll = PollLoop::new(
            ScriptedSource::new(vec![
                Err(RelayError::connection("refused")),
                Err(RelayError::protocol("garbage")),
                Ok(snapshot(10.0)),
            ]),
            sink.clone(),
            Duration::from_millis(10),
        );

        assert_eq!(
            poll.poll_once().await,
            CycleOutcome::ReadFailed(ErrorCategory::Connection)
        );
        assert_eq!(
            poll.poll_once().await,
            CycleOutcome::ReadFailed(ErrorCategory::Protocol)
        );
        assert!(sink.sent.lock().unwrap().is_empty());
        assert_eq!(poll.poll_once().await, CycleOutcome::Forwarded);
    }

    #[tokio::test]
    async fn test_read_failure_does_not_reset_baseline() {
        let sink = RecordingSink::default();
        let mut poll = PollLoop::new(
            ScriptedSource::new(vec![
                Ok(snapshot(10.0)),
                Err(RelayError::connection("refused")),
                Ok(snapshot(10.0)),
            ]),
            sink.clone(),
            Duration::from_millis(10),
        );

        poll.poll_once().await;
        poll.poll_once().await;
        assert_eq!(poll.poll_once().await, CycleOutcome::Unchanged);
        assert_eq!(sink.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_waits_one_interval_before_first_read() {
        let sink = RecordingSink::default();
        let poll = PollLoop::new(
            ScriptedSource::new(vec![Ok(snapshot(10.0))]),
            sink.clone(),
            Duration::from_secs(5),
        );
        let handle = tokio::spawn(poll.run());

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(sink.sent.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(sink.sent.lock().unwrap().len(), 1);

        handle.abort();
    }
}
