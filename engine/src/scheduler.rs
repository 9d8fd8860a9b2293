use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A named periodic background task with an explicit stop handle.
///
/// Failure policy: a tick that returns `Err` is logged and counted, and the
/// loop keeps going — a background refresh must never take the process down
/// or stall its own schedule. Only `stop()` (or shutdown) ends the loop.
pub struct Ticker;

pub struct TickerHandle {
    name: String,
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn<F, Fut>(name: impl Into<String>, period: Duration, mut tick: F) -> TickerHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send,
    {
        let name = name.into();
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let loop_name = name.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            tracing::info!("⏱️ Ticker '{}' ONLINE ({:?} period)", loop_name, period);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        crate::telemetry::TICKS_TOTAL
                            .with_label_values(&[loop_name.as_str()])
                            .inc();
                        if let Err(e) = tick().await {
                            crate::telemetry::TICK_FAILURES
                                .with_label_values(&[loop_name.as_str()])
                                .inc();
                            tracing::warn!("⚠️ Ticker '{}' tick failed: {:#}. Continuing.", loop_name, e);
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        tracing::info!("🛑 Ticker '{}' stopping.", loop_name);
                        break;
                    }
                }
            }
        });

        TickerHandle {
            name,
            shutdown: shutdown_tx,
            handle,
        }
    }
}

impl TickerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signal the loop and wait for it to drain.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn ticks_keep_firing_after_failures() {
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = Arc::clone(&count);

        let handle = Ticker::spawn("flaky-test", Duration::from_millis(5), move || {
            let count = Arc::clone(&count_clone);
            async move {
                let n = count.fetch_add(1, Ordering::SeqCst);
                if n % 2 == 0 {
                    anyhow::bail!("simulated transient failure");
                }
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.stop().await;

        // every other tick failed, yet the loop kept running well past them
        assert!(count.load(Ordering::SeqCst) >= 6);
    }

    #[tokio::test]
    async fn stop_terminates_the_loop() {
        let count = Arc::new(AtomicU32::new(0));
        let count_clone = Arc::clone(&count);

        let handle = Ticker::spawn("stoppable-test", Duration::from_millis(5), move || {
            let count = Arc::clone(&count_clone);
            async move {
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.stop().await;
        let after_stop = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }
}
