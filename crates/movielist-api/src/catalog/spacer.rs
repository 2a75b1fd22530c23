//! Send-slot reservation for catalog requests.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Hands out send slots at least `min_interval` apart.
///
/// Each caller reserves the next free slot under a short lock and sleeps
/// outside it, so concurrent requests on one client queue up in reservation
/// order instead of firing back to back.
#[derive(Debug)]
pub(crate) struct RequestSpacer {
    min_interval: Duration,
    /// Earliest instant the next request may be sent.
    next_slot: Mutex<Option<Instant>>,
}

impl RequestSpacer {
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Waits for this caller's send slot.
    pub(crate) async fn pace(&self) {
        let delay = self.reserve(Instant::now());
        if !delay.is_zero() {
            tracing::trace!(delay_ms = delay.as_millis(), "spacing catalog request");
            tokio::time::sleep(delay).await;
        }
    }

    /// Reserves the first free slot at or after `now` and returns how long
    /// the caller has to wait for it.
    fn reserve(&self, now: Instant) -> Duration {
        let mut next_slot = self
            .next_slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let slot = next_slot.filter(|slot| *slot > now).unwrap_or(now);
        *next_slot = Some(slot.checked_add(self.min_interval).unwrap_or(slot));
        slot.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(100);

    #[test]
    fn test_first_reservation_is_immediate() {
        // Arrange
        let spacer = RequestSpacer::new(STEP);

        // Act
        let delay = spacer.reserve(Instant::now());

        // Assert
        assert_eq!(delay, Duration::ZERO);
    }

    #[test]
    fn test_back_to_back_reservations_queue_up() {
        // Arrange
        let spacer = RequestSpacer::new(STEP);
        let now = Instant::now();

        // Act
        let first = spacer.reserve(now);
        let second = spacer.reserve(now);
        let third = spacer.reserve(now);

        // Assert
        assert_eq!(first, Duration::ZERO);
        assert_eq!(second, STEP);
        assert_eq!(third, STEP.saturating_mul(2));
    }

    #[test]
    fn test_reservation_after_interval_is_immediate() {
        // Arrange
        let spacer = RequestSpacer::new(STEP);
        let start = Instant::now();
        spacer.reserve(start);

        // Act
        let later = start.checked_add(STEP.saturating_mul(3)).unwrap_or(start);
        let delay = spacer.reserve(later);

        // Assert
        assert_eq!(delay, Duration::ZERO);
    }

    #[test]
    fn test_partial_wait_counts_elapsed_time() {
        // Arrange
        let spacer = RequestSpacer::new(STEP);
        let start = Instant::now();
        spacer.reserve(start);

        // Act
        let later = start
            .checked_add(Duration::from_millis(30))
            .unwrap_or(start);
        let delay = spacer.reserve(later);

        // Assert
        assert_eq!(delay, Duration::from_millis(70));
    }

    #[test]
    fn test_zero_interval_never_waits() {
        // Arrange
        let spacer = RequestSpacer::new(Duration::ZERO);
        let now = Instant::now();

        // Act & Assert
        for _ in 0..5 {
            assert_eq!(spacer.reserve(now), Duration::ZERO);
        }
    }

    #[tokio::test]
    async fn test_pace_sleeps_for_reserved_slot() {
        // Arrange
        let spacer = RequestSpacer::new(Duration::from_millis(50));

        // Act
        let start = Instant::now();
        spacer.pace().await;
        spacer.pace().await;

        // Assert
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
