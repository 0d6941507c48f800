//! Activation correlation over NetworkManager state-change signals.
//!
//! Activating a profile returns immediately; whether it worked is only known
//! once NetworkManager emits `Connection.Active.StateChanged` for it. The
//! correlator races three things and takes whichever resolves first:
//!
//! - the next signal on an invocation-scoped subscription
//! - the activation deadline
//! - the caller's cancellation token
//!
//! What counts as "our" signal is decided by an [`ActivationMatcher`]. The
//! deadline is never reset by unrelated signals.

use std::pin::pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::{FutureExt, StreamExt, select};
use futures_timer::Delay;
use log::{debug, warn};
use tokio_util::sync::CancellationToken;
use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::models::{
    ActivationState, ConnectionError, ConnectionStateReason, connection_state_reason_to_error,
};
use crate::bus::{BusSignal, NetworkBus, SignalStream};

/// Outcome of inspecting one state-change signal.
#[derive(Debug)]
pub(crate) enum Verdict {
    /// Not ours, or not terminal yet.
    Continue,
    Success,
    Failure(ConnectionError),
}

/// Decides whether a state change settles the activation being awaited.
#[async_trait]
pub(crate) trait ActivationMatcher: Send + Sync {
    async fn evaluate(&self, path: &OwnedObjectPath, state: ActivationState, reason: u32)
    -> Verdict;

    /// Error returned when the deadline elapses first.
    fn timeout_error(&self) -> ConnectionError;
}

/// Matches any active connection: the first activated signal wins and the
/// first deactivated one fails with its reason.
///
/// Used when only one activation is in flight.
pub(crate) struct AnyActivation;

#[async_trait]
impl ActivationMatcher for AnyActivation {
    async fn evaluate(
        &self,
        _path: &OwnedObjectPath,
        state: ActivationState,
        reason: u32,
    ) -> Verdict {
        match state {
            ActivationState::Activated => Verdict::Success,
            ActivationState::Deactivated => Verdict::Failure(connection_state_reason_to_error(reason)),
            _ => Verdict::Continue,
        }
    }

    fn timeout_error(&self) -> ConnectionError {
        ConnectionError::Timeout
    }
}

/// Matches the active connection created from one settings profile.
///
/// Signals carry the active-connection path, so every activated signal
/// costs one `Connection` property read to map it back to its profile.
/// Deactivations never fail the wait: they usually belong to connections
/// torn down to make room for this one.
pub(crate) struct ProfileActivation<'a> {
    bus: &'a dyn NetworkBus,
    profile: &'a OwnedObjectPath,
}

impl<'a> ProfileActivation<'a> {
    pub(crate) fn new(bus: &'a dyn NetworkBus, profile: &'a OwnedObjectPath) -> Self {
        Self { bus, profile }
    }
}

#[async_trait]
impl ActivationMatcher for ProfileActivation<'_> {
    async fn evaluate(
        &self,
        path: &OwnedObjectPath,
        state: ActivationState,
        _reason: u32,
    ) -> Verdict {
        if state != ActivationState::Activated {
            return Verdict::Continue;
        }

        match self.bus.active_connection_profile(path).await {
            Ok(profile) if &profile == self.profile => Verdict::Success,
            Ok(profile) => {
                debug!(
                    "{} activated for unrelated profile {}",
                    path.as_str(),
                    profile.as_str()
                );
                Verdict::Continue
            }
            Err(e) => {
                warn!("Could not resolve profile of {}: {e}", path.as_str());
                Verdict::Continue
            }
        }
    }

    fn timeout_error(&self) -> ConnectionError {
        ConnectionError::HotspotTimeout
    }
}

/// Waits until `matcher` settles the activation, the deadline elapses, or
/// `cancel` fires.
///
/// The subscription is consumed and dropped on every exit path.
pub(crate) async fn await_activation<M>(
    signals: SignalStream,
    matcher: &M,
    deadline: Duration,
    cancel: &CancellationToken,
) -> Result<()>
where
    M: ActivationMatcher + ?Sized,
{
    let mut stream = signals.fuse();
    let mut timeout_delay = pin!(Delay::new(deadline).fuse());
    let mut cancelled = pin!(cancel.cancelled().fuse());

    loop {
        select! {
            _ = timeout_delay => {
                warn!("Activation timed out after {deadline:?}");
                return Err(matcher.timeout_error());
            }
            _ = cancelled => {
                debug!("Activation wait cancelled");
                return Err(ConnectionError::Cancelled);
            }
            signal_opt = stream.next() => {
                match signal_opt {
                    Some(BusSignal::ActiveStateChanged { path, state, reason }) => {
                        let state = ActivationState::from(state);
                        debug!(
                            "{} changed to {state} (reason: {})",
                            path.as_str(),
                            ConnectionStateReason::from(reason)
                        );

                        match matcher.evaluate(&path, state, reason).await {
                            Verdict::Continue => {}
                            Verdict::Success => {
                                debug!("Activation confirmed by {}", path.as_str());
                                return Ok(());
                            }
                            Verdict::Failure(e) => {
                                debug!("Activation failed: {e}");
                                return Err(e);
                            }
                        }
                    }
                    Some(BusSignal::Other { member }) => {
                        debug!("Ignoring unexpected signal {member}");
                    }
                    None => {
                        return Err(ConnectionError::Stuck("signal stream ended".into()));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{FakeBus, path};
    use futures::channel::mpsc;
    use std::sync::Arc;
    use std::time::Instant;

    const ACTIVATED: u32 = 2;
    const DEACTIVATED: u32 = 4;

    fn state_changed(p: &str, state: u32, reason: u32) -> BusSignal {
        BusSignal::ActiveStateChanged {
            path: path(p),
            state,
            reason,
        }
    }

    fn scripted(signals: Vec<BusSignal>) -> (mpsc::UnboundedSender<BusSignal>, SignalStream) {
        let (tx, rx) = mpsc::unbounded();
        for s in signals {
            tx.unbounded_send(s).unwrap();
        }
        (tx, rx.boxed())
    }

    #[tokio::test]
    async fn immediate_activation_does_not_wait_for_deadline() {
        let (_tx, stream) = scripted(vec![state_changed("/a/1", ACTIVATED, 0)]);
        let start = Instant::now();

        let result = await_activation(
            stream,
            &AnyActivation,
            Duration::from_secs(30),
            &CancellationToken::new(),
        )
        .await;

        assert!(result.is_ok());
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn silent_stream_times_out_after_deadline() {
        let (_tx, stream) = scripted(Vec::new());
        let deadline = Duration::from_millis(200);
        let start = Instant::now();

        let result =
            await_activation(stream, &AnyActivation, deadline, &CancellationToken::new()).await;

        let elapsed = start.elapsed();
        assert!(matches!(result, Err(ConnectionError::Timeout)));
        assert!(elapsed >= deadline);
        assert!(elapsed < deadline + Duration::from_secs(2));
    }

    #[tokio::test]
    async fn steady_progress_signals_do_not_extend_deadline() {
        let bus = Arc::new(FakeBus::new());
        let stream = bus.subscribe_state_changes(16).await.unwrap();
        let emitter = Arc::clone(&bus);
        let drip = tokio::spawn(async move {
            for _ in 0..40 {
                tokio::time::sleep(Duration::from_millis(50)).await;
                emitter.emit(state_changed("/a/1", 1, 0));
            }
        });

        let deadline = Duration::from_millis(200);
        let start = Instant::now();
        let result =
            await_activation(stream, &AnyActivation, deadline, &CancellationToken::new()).await;
        let elapsed = start.elapsed();
        drip.abort();

        assert!(matches!(result, Err(ConnectionError::Timeout)));
        assert!(elapsed >= deadline);
        assert!(elapsed < Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn intermediate_states_keep_waiting() {
        let (_tx, stream) = scripted(vec![
            state_changed("/a/1", 1, 0),
            state_changed("/a/1", 3, 0),
            state_changed("/a/1", ACTIVATED, 0),
        ]);

        let result = await_activation(
            stream,
            &AnyActivation,
            Duration::from_secs(5),
            &CancellationToken::new(),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn deactivation_fails_with_reason() {
        // 9 = NoSecrets
        let (_tx, stream) = scripted(vec![state_changed("/a/1", DEACTIVATED, 9)]);

        let result = await_activation(
            stream,
            &AnyActivation,
            Duration::from_secs(5),
            &CancellationToken::new(),
        )
        .await;
        assert!(matches!(result, Err(ConnectionError::AuthFailed)));
    }

    #[tokio::test]
    async fn other_signals_are_skipped() {
        let (_tx, stream) = scripted(vec![
            BusSignal::Other {
                member: "PropertiesChanged".into(),
            },
            state_changed("/a/1", ACTIVATED, 0),
        ]);

        let result = await_activation(
            stream,
            &AnyActivation,
            Duration::from_secs(5),
            &CancellationToken::new(),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn ended_stream_is_stuck() {
        let (tx, stream) = scripted(Vec::new());
        drop(tx);

        let result = await_activation(
            stream,
            &AnyActivation,
            Duration::from_secs(5),
            &CancellationToken::new(),
        )
        .await;
        assert!(matches!(result, Err(ConnectionError::Stuck(_))));
    }

    #[tokio::test]
    async fn cancellation_wins_over_deadline() {
        let (_tx, stream) = scripted(Vec::new());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result =
            await_activation(stream, &AnyActivation, Duration::from_secs(30), &cancel).await;
        assert!(matches!(result, Err(ConnectionError::Cancelled)));
    }

    #[tokio::test]
    async fn profile_matcher_resolves_active_connection() {
        let bus = FakeBus::new()
            .with_active("/active/other", "/settings/other", &[])
            .with_active("/active/mine", "/settings/mine", &[]);
        let profile = path("/settings/mine");
        let matcher = ProfileActivation::new(&bus, &profile);

        let (_tx, stream) = scripted(vec![
            state_changed("/active/other", DEACTIVATED, 2),
            state_changed("/active/other", ACTIVATED, 0),
            state_changed("/active/mine", ACTIVATED, 0),
        ]);

        let result = await_activation(
            stream,
            &matcher,
            Duration::from_secs(5),
            &CancellationToken::new(),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn profile_matcher_times_out_as_hotspot_timeout() {
        let bus = FakeBus::new().with_active("/active/other", "/settings/other", &[]);
        let profile = path("/settings/mine");
        let matcher = ProfileActivation::new(&bus, &profile);

        let (_tx, stream) = scripted(vec![
            state_changed("/active/other", ACTIVATED, 0),
            state_changed("/active/gone", ACTIVATED, 0),
        ]);

        let result = await_activation(
            stream,
            &matcher,
            Duration::from_millis(100),
            &CancellationToken::new(),
        )
        .await;
        assert!(matches!(result, Err(ConnectionError::HotspotTimeout)));
    }
}
