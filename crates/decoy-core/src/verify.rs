//! Deferred verifications

use decoy_spy::{Expectation, Spy, VerificationError};
use parking_lot::Mutex;

/// Expectations registered during setup and checked at the end of a test
#[derive(Debug, Default)]
pub struct VerificationQueue {
    pending: Mutex<Vec<(Spy, Expectation)>>,
}

impl VerificationQueue {
    /// Create an empty queue
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `expectation` against `spy`
    pub fn push(&self, spy: Spy, expectation: Expectation) {
        tracing::trace!(spy = spy.name(), %expectation, "verification queued");
        self.pending.lock().push((spy, expectation));
    }

    /// Number of queued expectations
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Check whether nothing is queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Check every queued expectation, in registration order
    ///
    /// The queue is kept, so calling this again re-checks everything.
    ///
    /// # Errors
    /// Every failure, combined into one [`VerificationError`].
    pub fn check_all(&self) -> Result<(), VerificationError> {
        let pending = self.pending.lock().clone();
        let failures: Vec<VerificationError> = pending
            .iter()
            .filter_map(|(spy, expectation)| expectation.check(spy).err())
            .inspect(|failure| tracing::warn!(%failure, "verification failed"))
            .collect();
        VerificationError::combine(failures).map_or(Ok(()), Err)
    }
}

/// Registers deferred expectations for one spy
///
/// Handed to the configure callbacks of `TypeMocker::mock_with` and
/// friends.
#[derive(Debug)]
pub struct Verifier<'a> {
    spy: Spy,
    queue: &'a VerificationQueue,
}

impl<'a> Verifier<'a> {
    pub(crate) fn new(spy: Spy, queue: &'a VerificationQueue) -> Self {
        Self { spy, queue }
    }

    /// Check `expectation` when the engine verifies
    pub fn expect(&self, expectation: Expectation) -> &Self {
        self.queue.push(self.spy.clone(), expectation);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decoy_object::Value;

    #[test]
    fn passes_when_everything_holds() {
        let queue = VerificationQueue::new();
        let spy = Spy::new("m");
        queue.push(spy.clone(), Expectation::Called);
        spy.call(&[]).unwrap();
        assert!(queue.check_all().is_ok());
    }

    #[test]
    fn collects_all_failures() {
        let queue = VerificationQueue::new();
        let spy = Spy::new("m");
        Verifier::new(spy.clone(), &queue)
            .expect(Expectation::Called)
            .expect(Expectation::called_with([Value::Int(1)]));
        queue.push(spy, Expectation::NotCalled);

        let err = queue.check_all().unwrap_err();
        assert_eq!(err.count(), 2);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn checks_at_verification_time_not_registration_time() {
        let queue = VerificationQueue::new();
        let spy = Spy::new("m");
        queue.push(spy.clone(), Expectation::CalledTimes(2));
        assert!(queue.check_all().is_err());
        spy.call(&[]).unwrap();
        spy.call(&[]).unwrap();
        assert!(queue.check_all().is_ok());
    }
}
