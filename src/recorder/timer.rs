//! Session timer
//!
//! Ticks once per period while a recording is active. The timer task lives
//! exactly as long as the [`SessionTimer`] guard held by the active
//! recording.

use super::encoder::{EventSender, RecorderEvent, RecordingError, RecordingResult};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use uuid::Uuid;

/// Periodic tick source for one recording session
#[derive(Debug)]
pub struct SessionTimer {
    session_id: Uuid,
    handle: JoinHandle<()>,
}

impl SessionTimer {
    /// Spawn the tick task on the current tokio runtime
    pub fn arm(session_id: Uuid, period: Duration, tx: EventSender) -> RecordingResult<Self> {
        if period.is_zero() {
            return Err(RecordingError::Runtime(
                "Session timer period must be non-zero".to_string(),
            ));
        }

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| RecordingError::Runtime(format!("No runtime for session timer: {}", e)))?;

        let handle = runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if tx.send(RecorderEvent::Tick { session_id }).is_err() {
                    break;
                }
            }
        });

        tracing::debug!("Session timer armed for {} ({:?})", session_id, period);
        Ok(Self { session_id, handle })
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("Session timer disarmed for {}", self.session_id);
    }
}

/// Format whole seconds as `HH:MM:SS`. Hours are not wrapped.
pub fn format_time(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00:00");
        assert_eq!(format_time(59), "00:00:59");
        assert_eq!(format_time(3661), "01:01:01");
    }

    #[test]
    fn test_format_time_hours_not_wrapped() {
        assert_eq!(format_time(100 * 3600 + 5), "100:00:05");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        let _timer = SessionTimer::arm(id, Duration::from_secs(1), tx).unwrap();

        tokio::time::sleep(Duration::from_millis(3500)).await;

        let mut ticks = 0;
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event, RecorderEvent::Tick { session_id: id });
            ticks += 1;
        }
        assert_eq!(ticks, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_disarms() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = SessionTimer::arm(Uuid::new_v4(), Duration::from_secs(1), tx).unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        drop(timer);
        tokio::time::sleep(Duration::from_secs(5)).await;

        let mut ticks = 0;
        while rx.try_recv().is_ok() {
            ticks += 1;
        }
        assert_eq!(ticks, 1);
    }

    #[tokio::test]
    async fn test_zero_period_rejected() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = SessionTimer::arm(Uuid::new_v4(), Duration::ZERO, tx);
        assert!(matches!(result, Err(RecordingError::Runtime(_))));
    }

    #[test]
    fn test_arm_without_runtime_fails() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let result = SessionTimer::arm(Uuid::new_v4(), Duration::from_secs(1), tx);
        assert!(matches!(result, Err(RecordingError::Runtime(_))));
    }
}
