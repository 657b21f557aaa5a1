//! The reply polling loop.

use crate::backend::ChatBackend;
use crate::error::ChatError;
use crate::session::ChatSession;
use std::time::Duration;
use tokio::sync::watch;

/// Timing of the polling loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_interval: Duration,
    /// Factor applied to the delay after an empty batch. `1.0` keeps a
    /// fixed cadence.
    pub backoff: f64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(5),
            backoff: 1.0,
        }
    }
}

impl PollSettings {
    /// Delay before the fetch that follows one returning `received` replies.
    pub fn next_delay(&self, current: Duration, received: usize) -> Duration {
        if received > 0 || self.backoff.is_nan() || self.backoff <= 1.0 {
            return self.interval;
        }
        let cap = self.max_interval.max(self.interval);
        Duration::try_from_secs_f64(current.as_secs_f64() * self.backoff)
            .unwrap_or(cap)
            .min(cap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The backend reported the final batch.
    Completed,
    /// The cancel signal fired before the final batch arrived.
    Cancelled,
}

/// Fetches replies one batch at a time until the exchange is over.
///
/// Only one fetch is ever in flight: the next delay starts after the
/// previous response has been applied.
#[derive(Debug, Clone, Default)]
pub struct ReplyPoller {
    settings: PollSettings,
}

impl ReplyPoller {
    pub fn new(settings: PollSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Runs until a final batch, an error or cancellation.
    ///
    /// Cancellation is signalled by sending `true` on the watch channel or by
    /// dropping its sender.
    pub async fn run(
        &self,
        backend: &dyn ChatBackend,
        session: &mut ChatSession,
        cancel: &mut watch::Receiver<bool>,
    ) -> Result<PollOutcome, ChatError> {
        let mut delay = self.settings.interval;
        let mut round = 0u64;

        loop {
            if *cancel.borrow() {
                log::debug!("Reply polling cancelled before round {}", round);
                return Ok(PollOutcome::Cancelled);
            }

            tokio::select! {
                biased;
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        log::debug!("Reply polling cancelled during round {}", round);
                        return Ok(PollOutcome::Cancelled);
                    }
                    continue;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            round += 1;
            let batch = match backend.get_replies().await {
                Ok(batch) => batch,
                Err(e) => {
                    log::error!("Error fetching replies: {}", e);
                    session.abort();
                    return Err(e);
                }
            };

            if let Some(error) = batch.error {
                log::error!("Backend reported an error: {}", error);
                session.abort();
                return Err(ChatError::Server(error));
            }

            let received = batch.replies.len();
            log::debug!(
                "Poll round {}: {} replies, final={}",
                round,
                received,
                batch.is_final
            );
            if let Some(note) = &batch.message {
                log::debug!("Backend note: {}", note);
            }
            session.apply_replies(&batch.replies);

            if batch.is_final {
                session.complete();
                return Ok(PollOutcome::Completed);
            }

            delay = self.settings.next_delay(delay, received);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_cadence_by_default() {
        let settings = PollSettings::default();
        let d = settings.interval;
        assert_eq!(settings.next_delay(d, 0), Duration::from_millis(500));
        assert_eq!(settings.next_delay(d, 3), Duration::from_millis(500));
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let settings = PollSettings {
            interval: Duration::from_millis(100),
            max_interval: Duration::from_millis(300),
            backoff: 2.0,
        };
        let d1 = settings.next_delay(settings.interval, 0);
        assert_eq!(d1, Duration::from_millis(200));
        let d2 = settings.next_delay(d1, 0);
        assert_eq!(d2, Duration::from_millis(300));
        assert_eq!(settings.next_delay(d2, 0), Duration::from_millis(300));
        assert_eq!(settings.next_delay(d2, 1), Duration::from_millis(100));
    }

    #[test]
    fn test_huge_backoff_is_capped() {
        let settings = PollSettings {
            backoff: 1e30,
            ..PollSettings::default()
        };
        let d = settings.next_delay(settings.interval, 0);
        assert_eq!(d, Duration::from_secs(5));
        assert_eq!(settings.next_delay(d, 0), Duration::from_secs(5));

        let settings = PollSettings {
            backoff: f64::INFINITY,
            ..PollSettings::default()
        };
        assert_eq!(settings.next_delay(settings.interval, 0), Duration::from_secs(5));
    }

    #[test]
    fn test_nan_backoff_keeps_interval() {
        let settings = PollSettings {
            backoff: f64::NAN,
            ..PollSettings::default()
        };
        assert_eq!(settings.next_delay(settings.interval, 0), settings.interval);
    }
}
