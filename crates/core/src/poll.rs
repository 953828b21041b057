//! Clear-channel polling state machine
//!
//! A channel clear may complete synchronously (200) or be accepted for
//! asynchronous processing (202). In the blocking case the poller re-invokes
//! an idempotent channel-empty check on a fixed interval until the channel
//! drains or the check itself fails. The interval lives inside the polling
//! future, so dropping the future releases the timer on every exit path.

use std::time::Duration;

use serde_json::json;
use tagstream_domain::constants::CLEAR_POLL_INTERVAL_MS;
use tagstream_domain::{ApiResponse, ClearOutcome, ClearState, Result, TagStreamError};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::ports::ChannelEmptyProbe;

/// Resolves the initial clear response into a terminal [`ClearOutcome`].
///
/// States: `Requested → (Completed | Pending → Polling → (Completed |
/// Failed))`, with `TimedOut` as the normal terminal state when the caller
/// asked for a non-blocking return on a 202. Blocking mode has no upper
/// bound; polling continues until success or error.
pub struct ClearPoller<'a> {
    probe: &'a dyn ChannelEmptyProbe,
    poll_interval: Duration,
    state: ClearState,
}

impl<'a> ClearPoller<'a> {
    pub fn new(probe: &'a dyn ChannelEmptyProbe) -> Self {
        Self {
            probe,
            poll_interval: Duration::from_millis(CLEAR_POLL_INTERVAL_MS),
            state: ClearState::Requested,
        }
    }

    /// Override the fixed poll interval (tests use short intervals).
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn state(&self) -> ClearState {
        self.state
    }

    /// Drive the clear operation to a terminal state.
    ///
    /// `initial` is the response of the clear request itself; its body
    /// carries the deletion counters that end up in the completed outcome.
    pub async fn resolve(
        &mut self,
        channel_id: i64,
        initial: ApiResponse,
        wait_until_complete: bool,
    ) -> Result<ClearOutcome> {
        match initial.status {
            200 => {
                info!(channel_id, "channel clear completed synchronously");
                self.state = ClearState::Completed;
                Ok(Self::completed_outcome(initial.body))
            }
            202 if !wait_until_complete => {
                debug!(channel_id, "clear accepted; returning without polling");
                self.state = ClearState::TimedOut;
                Ok(ClearOutcome {
                    clear_complete: false,
                    meta: json!({ "timeout": self.poll_interval.as_millis() as u64 }),
                })
            }
            202 => {
                self.state = ClearState::Pending;
                self.poll_until_empty(channel_id, initial).await
            }
            status => {
                self.state = ClearState::Failed;
                Err(TagStreamError::Api { status, body: initial.body.to_string() })
            }
        }
    }

    async fn poll_until_empty(
        &mut self,
        channel_id: i64,
        initial: ApiResponse,
    ) -> Result<ClearOutcome> {
        self.state = ClearState::Polling;
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // the first tick of a tokio interval completes immediately; the
        // first check happens one full interval after the 202
        ticker.tick().await;

        loop {
            ticker.tick().await;
            debug!(channel_id, "checking whether channel is empty");

            match self.probe.is_empty(channel_id).await {
                Ok(true) => {
                    info!(channel_id, "channel clear confirmed");
                    self.state = ClearState::Completed;
                    return Ok(Self::completed_outcome(initial.body));
                }
                Ok(false) => {
                    debug!(channel_id, "channel not empty yet");
                }
                Err(err) => {
                    warn!(channel_id, error = %err, "channel-empty check failed");
                    self.state = ClearState::Failed;
                    return Err(TagStreamError::ClearPoll {
                        status: initial.status,
                        body: initial.body.to_string(),
                        source: Box::new(err),
                    });
                }
            }
        }
    }

    /// The original clear response body, extended with `clearComplete`.
    fn completed_outcome(body: serde_json::Value) -> ClearOutcome {
        let meta = match body {
            serde_json::Value::Object(mut map) => {
                map.insert("clearComplete".to_string(), json!(true));
                serde_json::Value::Object(map)
            }
            _ => json!({ "clearComplete": true }),
        };
        ClearOutcome { clear_complete: true, meta }
    }
}
