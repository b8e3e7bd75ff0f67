//! Screenshot handshake between the tool layer and the connected browser.
//!
//! The agent cannot capture pixels itself — it flags a request, the browser
//! notices the flag on its next poll, captures, and posts the PNG back. The
//! exchange never touches the canvas lock.

use std::time::Duration;

use tokio::sync::{Mutex, Notify};

#[derive(Default)]
struct Slot {
    requested: bool,
    /// Base64-encoded PNG posted by the browser.
    data: Option<String>,
}

/// One-slot store-and-forward exchange for screenshot requests.
#[derive(Default)]
pub struct ScreenshotExchange {
    slot: Mutex<Slot>,
    notify: Notify,
}

impl ScreenshotExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a capture is currently pending. Reported to the browser in its
    /// poll response.
    pub async fn requested(&self) -> bool {
        self.slot.lock().await.requested
    }

    /// Fulfill a pending request with captured image data. A capture that
    /// arrives with no request pending is dropped.
    pub async fn fulfill(&self, data: String) {
        let mut slot = self.slot.lock().await;
        if slot.requested {
            slot.data = Some(data);
            slot.requested = false;
            self.notify.notify_waiters();
        }
    }

    /// Request a capture and wait for the browser to deliver it. Returns
    /// `None` if no capture arrives within the deadline.
    pub async fn capture(&self, deadline: Duration) -> Option<String> {
        {
            let mut slot = self.slot.lock().await;
            slot.data = None;
            slot.requested = true;
        }

        let wait = tokio::time::timeout(deadline, async {
            loop {
                let notified = self.notify.notified();
                if let Some(data) = self.slot.lock().await.data.take() {
                    return data;
                }
                notified.await;
            }
        })
        .await;

        match wait {
            Ok(data) => Some(data),
            Err(_) => {
                self.slot.lock().await.requested = false;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_capture_receives_posted_data() {
        let exchange = Arc::new(ScreenshotExchange::new());

        let poster = exchange.clone();
        tokio::spawn(async move {
            // wait until the request flag is visible, like a polling browser
            while !poster.requested().await {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            poster.fulfill("cGl4ZWxz".to_string()).await;
        });

        let data = exchange.capture(Duration::from_secs(2)).await;
        assert_eq!(data.as_deref(), Some("cGl4ZWxz"));
        assert!(!exchange.requested().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capture_times_out_and_clears_flag() {
        let exchange = ScreenshotExchange::new();
        let data = exchange.capture(Duration::from_secs(10)).await;
        assert!(data.is_none());
        assert!(!exchange.requested().await);
    }

    #[tokio::test]
    async fn test_unrequested_capture_is_dropped() {
        let exchange = ScreenshotExchange::new();
        exchange.fulfill("stray".to_string()).await;
        assert!(!exchange.requested().await);
        // a later capture must not see the stray data
        let data = exchange.capture(Duration::from_millis(20)).await;
        assert!(data.is_none());
    }
}
