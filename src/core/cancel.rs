// src/core/cancel.rs
use std::sync::{ Arc, Condvar, Mutex, PoisonError };
use std::time::Duration;

/// Cooperative stop flag shared between a frontend and one crawl.
///
/// Cloning shares the flag. Once cancelled it stays cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let (flag, cv) = &*self.inner;
        *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cv.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        let (flag, _) = &*self.inner;
        *flag.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block for up to `dur`, waking early on cancel.
    /// Returns `true` if the token is cancelled when the wait ends.
    pub fn sleep(&self, dur: Duration) -> bool {
        let (flag, cv) = &*self.inner;
        let guard = flag.lock().unwrap_or_else(PoisonError::into_inner);
        if *guard || dur.is_zero() {
            return *guard;
        }
        let (guard, _timeout) = cv
            .wait_timeout_while(guard, dur, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn sleep_wakes_on_cancel() {
        let token = CancelToken::new();
        let remote = token.clone();
        let t = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            remote.cancel();
        });

        let started = Instant::now();
        assert!(token.sleep(Duration::from_secs(30)));
        assert!(started.elapsed() < Duration::from_secs(10));
        t.join().unwrap();
    }

    #[test]
    fn sleep_runs_full_duration_when_not_cancelled() {
        let token = CancelToken::new();
        assert!(!token.sleep(Duration::from_millis(20)));
        assert!(!token.is_cancelled());
    }
}
