//! Debounced input
//!
//! A value is emitted only once no newer value has arrived for the full
//! delay. Each new value restarts the timer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

/// Capacity of the input and output channels
const CHANNEL_CAPACITY: usize = 64;

/// Handle to a background debounce task
pub struct Debouncer<T> {
    input: mpsc::Sender<T>,
    output: mpsc::Receiver<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the debounce task on the current runtime
    pub fn new(delay: Duration) -> Self {
        let (input, input_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (output_tx, output) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(run(input_rx, output_tx, delay));
        Self { input, output }
    }

    /// Feed a raw value; false once the task has stopped
    pub async fn push(&self, value: T) -> bool {
        self.input.send(value).await.is_ok()
    }

    /// Next settled value; `None` once every sender is dropped and the
    /// last pending value has been delivered.
    pub async fn next(&mut self) -> Option<T> {
        self.output.recv().await
    }

    /// Stop accepting input; the pending value, if any, is still emitted
    pub fn close(self) -> mpsc::Receiver<T> {
        self.output
    }
}

async fn run<T>(mut input: mpsc::Receiver<T>, output: mpsc::Sender<T>, delay: Duration) {
    let mut pending: Option<T> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        let wake_at = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

        tokio::select! {
            received = input.recv() => match received {
                Some(value) => {
                    pending = Some(value);
                    deadline = Some(Instant::now() + delay);
                }
                None => {
                    if let Some(value) = pending.take() {
                        let _ = output.send(value).await;
                    }
                    break;
                }
            },

            _ = sleep_until(wake_at), if deadline.is_some() => {
                deadline = None;
                if let Some(value) = pending.take() {
                    if output.send(value).await.is_err() {
                        break;
                    }
                }
            }
        }
    }

    log::debug!("Debounce task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_only_settled_value_is_emitted() {
        let mut debouncer = Debouncer::new(Duration::from_millis(80));
        for value in ["a", "ab", "abc"] {
            assert!(debouncer.push(value.to_string()).await);
        }

        let settled = debouncer.next().await;
        assert_eq!(settled.as_deref(), Some("abc"));

        let nothing = tokio::time::timeout(Duration::from_millis(200), debouncer.next()).await;
        assert!(nothing.is_err(), "no further value expected");
    }

    #[tokio::test]
    async fn test_values_separated_by_delay_are_all_emitted() {
        let mut debouncer = Debouncer::new(Duration::from_millis(20));

        debouncer.push(1).await;
        assert_eq!(debouncer.next().await, Some(1));

        debouncer.push(2).await;
        assert_eq!(debouncer.next().await, Some(2));
    }

    #[tokio::test]
    async fn test_pending_value_flushed_on_close() {
        let debouncer = Debouncer::new(Duration::from_secs(60));
        assert!(debouncer.push("last").await);

        let mut output = debouncer.close();
        assert_eq!(output.recv().await, Some("last"));
        assert_eq!(output.recv().await, None);
    }
}
