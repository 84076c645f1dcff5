use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;

/// Seconds left before another verification code may be requested.
///
/// One ticker runs at a time; restarting bumps the generation so the previous
/// ticker stops at its next tick.
#[derive(Clone)]
pub struct ResendCooldown {
    inner: Arc<CooldownInner>,
}

struct CooldownInner {
    remaining: watch::Sender<u32>,
    generation: AtomicU64,
}

impl CooldownInner {
    fn tick(&self) -> u32 {
        let mut left = 0;
        self.remaining.send_if_modified(|remaining| {
            if *remaining == 0 {
                return false;
            }
            *remaining -= 1;
            left = *remaining;
            true
        });
        left
    }
}

impl Default for ResendCooldown {
    fn default() -> Self {
        Self::new()
    }
}

impl ResendCooldown {
    #[must_use]
    pub fn new() -> Self {
        let (remaining, _) = watch::channel(0);
        Self {
            inner: Arc::new(CooldownInner {
                remaining,
                generation: AtomicU64::new(0),
            }),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        *self.inner.remaining.borrow()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.remaining() > 0
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.inner.remaining.subscribe()
    }

    /// Reset to `secs` and count down once per second on the runtime.
    pub fn start(&self, secs: u32) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.remaining.send_replace(secs);
        if secs == 0 {
            return;
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.tick().await;
            loop {
                interval.tick().await;
                if inner.generation.load(Ordering::SeqCst) != generation {
                    break;
                }
                if inner.tick() == 0 {
                    break;
                }
            }
        });
    }

    /// Advance the countdown by one second; returns what is left.
    pub fn tick(&self) -> u32 {
        self.inner.tick()
    }

    pub fn stop(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.remaining.send_replace(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_ticks_saturate_at_zero() {
        let cooldown = ResendCooldown::new();
        assert!(!cooldown.is_active());
        assert_eq!(cooldown.tick(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn counts_down_once_per_second() {
        let cooldown = ResendCooldown::new();
        cooldown.start(3);
        assert_eq!(cooldown.remaining(), 3);

        tokio::time::sleep(Duration::from_millis(1_050)).await;
        assert_eq!(cooldown.remaining(), 2);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(cooldown.remaining(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_ticker() {
        let cooldown = ResendCooldown::new();
        cooldown.start(60);
        tokio::time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(cooldown.remaining(), 50);

        cooldown.start(60);
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(cooldown.remaining(), 59);
    }
}
