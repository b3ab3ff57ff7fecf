use super::config::SessionConfig;
use super::state::{FailureReason, SessionState};
use crate::credential::{ChannelId, CredentialFetcher, SessionCredential};
use crate::device::{DeviceHandle, DeviceKind, DeviceManager};
use crate::error::{DeviceError, SessionError, TransportJoinError, TransportLeaveError};
use crate::participants::ParticipantRegistry;
use crate::transport::{JoinParams, TransportClient, TransportEvent};
use futures::stream::{Stream, StreamExt};
use std::slice;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

struct Inner {
    state: SessionState,
    credential: Option<SessionCredential>,
    /// Set once the transport confirmed the join; cleared when left
    transport_joined: bool,
    attempt_id: Option<Uuid>,
}

/// Drives one participant's presence in a call channel
///
/// State transitions are serialized through a single lock that is never held
/// across an await; long-running steps re-check the state when they resume,
/// so a `leave()` that arrives mid-join always wins.
pub struct SessionCoordinator {
    config: SessionConfig,
    fetcher: Arc<dyn CredentialFetcher>,
    transport: Arc<dyn TransportClient>,
    devices: Arc<DeviceManager>,
    participants: Arc<ParticipantRegistry>,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<SessionState>,
}

impl SessionCoordinator {
    pub fn new(
        config: SessionConfig,
        fetcher: Arc<dyn CredentialFetcher>,
        transport: Arc<dyn TransportClient>,
        devices: Arc<DeviceManager>,
        participants: Arc<ParticipantRegistry>,
    ) -> Self {
        info!("Creating call session for channel: {}", config.channel);

        let (state_tx, _) = watch::channel(SessionState::Idle);

        Self {
            config,
            fetcher,
            transport,
            devices,
            participants,
            inner: Mutex::new(Inner {
                state: SessionState::Idle,
                credential: None,
                transport_joined: false,
                attempt_id: None,
            }),
            state_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_state(&self, inner: &mut Inner, next: SessionState) {
        let attempt = inner
            .attempt_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        info!(attempt = %attempt, channel = %self.config.channel, "Session {} -> {}", inner.state, next);
        inner.state = next.clone();
        self.state_tx.send_replace(next);
    }

    /// Move `from -> to` if the session is still in `from`
    fn transition(&self, from: SessionState, to: SessionState) -> bool {
        let mut inner = self.lock();
        if inner.state != from {
            debug!("Skipping {} -> {}: session is {}", from, to, inner.state);
            return false;
        }
        self.set_state(&mut inner, to);
        true
    }

    fn is_leaving(&self) -> bool {
        self.lock().state == SessionState::Leaving
    }

    pub fn channel(&self) -> &ChannelId {
        &self.config.channel
    }

    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Current credential, if the session has joined
    pub fn credential(&self) -> Option<SessionCredential> {
        self.lock().credential.clone()
    }

    pub fn attempt_id(&self) -> Option<Uuid> {
        self.lock().attempt_id
    }

    /// Push notification hook: receives every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    pub fn devices(&self) -> &Arc<DeviceManager> {
        &self.devices
    }

    pub fn participants(&self) -> &Arc<ParticipantRegistry> {
        &self.participants
    }

    /// Acquire devices, fetch a credential and join the channel.
    ///
    /// Returns once the session is `Joined`, `Failed`, or `Left` because
    /// `leave()` was called while the join was in progress. Device failures
    /// do not fail the call; the missing track is just not published.
    pub async fn start(&self) -> Result<(), SessionError> {
        {
            let mut inner = self.lock();
            if inner.state != SessionState::Idle {
                warn!("Session already started ({})", inner.state);
                return Err(SessionError::InvalidState {
                    operation: "start",
                    state: inner.state.clone(),
                });
            }
            inner.attempt_id = Some(Uuid::new_v4());
            self.set_state(&mut inner, SessionState::AcquiringDevices);
        }

        // Wait for both attempts to settle, whatever their outcome.
        let (camera, microphone) = tokio::join!(
            self.acquire_settled(DeviceKind::Camera),
            self.acquire_settled(DeviceKind::Microphone),
        );
        for result in [camera, microphone] {
            if let Err(e) = result {
                warn!("Continuing without {}: {:#}", e.kind, e.cause);
            }
        }

        if !self.transition(SessionState::AcquiringDevices, SessionState::Joining) {
            self.finish_leave().await;
            return Ok(());
        }

        let credential = match self.fetcher.fetch(&self.config.channel).await {
            Ok(credential) => credential,
            Err(e) => {
                error!("Failed to fetch credential: {}", e);
                if !self.fail(FailureReason::Credential(e.to_string())) {
                    self.finish_leave().await;
                    return Ok(());
                }
                return Err(e.into());
            }
        };

        if self.is_leaving() {
            self.finish_leave().await;
            return Ok(());
        }

        let params = JoinParams {
            app_id: self.config.app_id.clone(),
            channel: self.config.channel.clone(),
            credential: credential.clone(),
        };

        if let Err(e) = self.transport.join(&params).await {
            let e = TransportJoinError(e);
            error!("{:#}", e);
            if !self.fail(FailureReason::Transport(e.to_string())) {
                self.finish_leave().await;
                return Ok(());
            }
            return Err(e.into());
        }

        let joined = {
            let mut inner = self.lock();
            inner.transport_joined = true;
            inner.credential = Some(credential);
            if inner.state == SessionState::Joining {
                self.set_state(&mut inner, SessionState::Joined);
                true
            } else {
                false
            }
        };

        if !joined {
            self.finish_leave().await;
            return Ok(());
        }

        self.publish_local_tracks().await;

        Ok(())
    }

    /// Acquire one device; release it at once if a leave arrived meanwhile
    async fn acquire_settled(&self, kind: DeviceKind) -> Result<DeviceHandle, DeviceError> {
        let result = self.devices.acquire(kind).await;
        if let Ok(handle) = &result {
            if self.is_leaving() {
                info!("Leave requested while acquiring {}; releasing", kind);
                self.devices.release(handle);
            }
        }
        result
    }

    async fn publish_local_tracks(&self) {
        for track in self.devices.handles() {
            match self.transport.publish(slice::from_ref(&track)).await {
                Ok(()) => info!("Published {} track {}", track.kind, track.id),
                Err(e) => warn!("Failed to publish {} track {}: {:#}", track.kind, track.id, e),
            }
        }
    }

    /// Enter `Failed` from `Joining`; false if a leave took over instead
    fn fail(&self, reason: FailureReason) -> bool {
        {
            let mut inner = self.lock();
            if inner.state != SessionState::Joining {
                return false;
            }
            inner.transport_joined = false;
            inner.credential = None;
            self.set_state(&mut inner, SessionState::Failed(reason));
        }
        self.devices.release_all();
        true
    }

    /// End the call.
    ///
    /// Devices are released before the transport is asked to leave, and a
    /// transport failure does not stop the session from reaching `Left`.
    /// While a join is still in progress this only marks the session as
    /// leaving; the in-flight `start()` completes the teardown.
    pub async fn leave(&self) {
        let joined = {
            let mut inner = self.lock();
            let current = inner.state.clone();
            match &current {
                SessionState::Idle => {
                    self.set_state(&mut inner, SessionState::Left);
                    return;
                }
                SessionState::AcquiringDevices | SessionState::Joining => {
                    self.set_state(&mut inner, SessionState::Leaving);
                    false
                }
                state if state.is_joined() => {
                    self.set_state(&mut inner, SessionState::Leaving);
                    true
                }
                _ => {
                    debug!("Leave ignored: session is {}", current);
                    return;
                }
            }
        };

        if joined {
            self.finish_leave().await;
        } else {
            self.devices.release_all();
        }
    }

    async fn finish_leave(&self) {
        self.devices.release_all();

        let joined = {
            let mut inner = self.lock();
            inner.credential = None;
            std::mem::take(&mut inner.transport_joined)
        };

        if joined {
            if let Err(e) = self.transport.leave().await {
                warn!("{:#}", TransportLeaveError(e));
            }
        }

        self.participants.clear().await;

        let mut inner = self.lock();
        self.set_state(&mut inner, SessionState::Left);
    }

    /// Explicit restart after a failure: `Failed -> Idle`
    pub fn reset(&self) -> Result<(), SessionError> {
        let mut inner = self.lock();
        if !matches!(inner.state, SessionState::Failed(_)) {
            return Err(SessionError::InvalidState {
                operation: "reset",
                state: inner.state.clone(),
            });
        }
        inner.attempt_id = None;
        self.set_state(&mut inner, SessionState::Idle);
        Ok(())
    }

    /// Claim the renewal slot; false if not joined or already renewing
    fn begin_renewal(&self) -> bool {
        self.transition(SessionState::Joined, SessionState::Renewing)
    }

    /// Fetch a fresh credential and hand it to the live connection.
    ///
    /// Failures are soft: the session stays joined on the old credential and
    /// the call drops if it lapses. There is no retry.
    async fn complete_renewal(&self) {
        match self.fetcher.fetch(&self.config.channel).await {
            Ok(credential) => {
                if self.lock().state != SessionState::Renewing {
                    info!("Session no longer joined; discarding renewed credential");
                    return;
                }
                match self.transport.renew_credential(&credential).await {
                    Ok(()) => {
                        let mut inner = self.lock();
                        if inner.state == SessionState::Renewing {
                            let previous = inner.credential.replace(credential);
                            if let Some(previous) = previous {
                                info!(
                                    "Credential renewed; replaced one fetched at {}",
                                    previous.fetched_at()
                                );
                            }
                        }
                    }
                    Err(e) => error!("Transport rejected renewed credential: {:#}", e),
                }
            }
            Err(e) => {
                error!("Credential renewal failed; keeping current credential: {}", e);
            }
        }

        self.transition(SessionState::Renewing, SessionState::Joined);
    }

    /// React to a credential-expiring notification, at most one at a time
    pub async fn renew(&self) {
        if !self.begin_renewal() {
            debug!("Renewal not started: session is {}", self.state());
            return;
        }
        self.complete_renewal().await;
    }

    /// Process one transport notification
    pub async fn handle_event(&self, event: TransportEvent) {
        if let TransportEvent::CredentialExpiringSoon = event {
            self.renew().await;
            return;
        }
        self.apply_membership(event).await;
    }

    async fn apply_membership(&self, event: TransportEvent) {
        if self.state().is_terminal() {
            debug!("Dropping {:?}: session is over", event);
            return;
        }

        match event {
            TransportEvent::ParticipantJoined(id) => self.participants.joined(id).await,
            TransportEvent::ParticipantLeft(id) => self.participants.left(&id).await,
            TransportEvent::TrackPublished(id, kind) => {
                if self.participants.track_published(id.clone(), kind).await {
                    if let Err(e) = self.transport.play_remote_audio(&id) {
                        warn!("Failed to play audio from {}: {:#}", id, e);
                    }
                }
            }
            TransportEvent::TrackUnpublished(id, kind) => {
                self.participants.track_unpublished(&id, kind).await
            }
            TransportEvent::CredentialExpiringSoon => {}
        }
    }

    /// Drain transport notifications until the stream ends.
    ///
    /// Renewals run on their own task so membership events keep flowing
    /// while a fetch is in flight.
    pub async fn run_events<S>(self: Arc<Self>, events: S)
    where
        S: Stream<Item = TransportEvent> + Send,
    {
        info!("Transport event task started");

        futures::pin_mut!(events);
        while let Some(event) = events.next().await {
            match event {
                TransportEvent::CredentialExpiringSoon => {
                    if self.begin_renewal() {
                        let this = Arc::clone(&self);
                        tokio::spawn(async move { this.complete_renewal().await });
                    } else {
                        debug!("Ignoring expiry notice: session is {}", self.state());
                    }
                }
                other => self.apply_membership(other).await,
            }
        }

        info!("Transport event task stopped");
    }
}
