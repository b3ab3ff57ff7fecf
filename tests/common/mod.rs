// Recording fakes for the external collaborators of a call session.
#![allow(dead_code)]

use anyhow::{bail, Result};
use loqa_call::{
    ChannelId, CredentialError, CredentialFailure, CredentialFetcher, DeviceHandle, DeviceKind,
    DeviceManager, JoinParams, MediaDevices, ParticipantId, ParticipantRegistry, SessionConfig,
    SessionCoordinator, SessionCredential, TransportClient,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const CHANNEL: &str = "team-standup";
pub const APP_ID: &str = "test-app";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Capture engine that can deny or hold back individual devices
#[derive(Default)]
pub struct FakeDevices {
    denied: Mutex<HashSet<DeviceKind>>,
    gates: Mutex<HashMap<DeviceKind, Arc<Notify>>>,
    opened: AtomicUsize,
    pub closed: Mutex<Vec<DeviceHandle>>,
    pub enabled_calls: Mutex<Vec<bool>>,
}

impl FakeDevices {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn deny(&self, kind: DeviceKind) {
        self.denied.lock().unwrap().insert(kind);
    }

    /// Hold `open(kind)` until the returned notify fires
    pub fn gate(&self, kind: DeviceKind) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(kind, gate.clone());
        gate
    }

    pub fn closed_count(&self) -> usize {
        self.closed.lock().unwrap().len()
    }

    pub fn opened_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MediaDevices for FakeDevices {
    async fn open(&self, kind: DeviceKind) -> Result<DeviceHandle> {
        let gate = self.gates.lock().unwrap().get(&kind).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.denied.lock().unwrap().contains(&kind) {
            bail!("permission denied");
        }

        let n = self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(DeviceHandle::new(format!("{}-{}", kind, n), kind))
    }

    fn set_enabled(&self, _handle: &DeviceHandle, enabled: bool) -> Result<()> {
        self.enabled_calls.lock().unwrap().push(enabled);
        Ok(())
    }

    fn close(&self, handle: &DeviceHandle) {
        self.closed.lock().unwrap().push(handle.clone());
    }

    fn name(&self) -> &str {
        "fake devices"
    }
}

/// Issuing service returning scripted results, `token-<n>` by default
#[derive(Default)]
pub struct FakeFetcher {
    calls: AtomicUsize,
    scripted: Mutex<VecDeque<Result<String, CredentialFailure>>>,
    gate: Mutex<Option<Arc<Notify>>>,
    pub entered: Notify,
}

impl FakeFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_failure(&self, cause: CredentialFailure) {
        self.scripted.lock().unwrap().push_back(Err(cause));
    }

    /// Hold every fetch until the returned notify fires
    pub fn gate(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CredentialFetcher for FakeFetcher {
    async fn fetch(&self, channel: &ChannelId) -> Result<SessionCredential, CredentialError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let scripted = self.scripted.lock().unwrap().pop_front();
        match scripted {
            Some(Err(cause)) => Err(CredentialError::new(channel.clone(), cause)),
            Some(Ok(token)) => Ok(SessionCredential::new(channel.clone(), token)),
            None => Ok(SessionCredential::new(
                channel.clone(),
                format!("token-{}", n + 1),
            )),
        }
    }
}

#[derive(Default)]
pub struct FakeTransport {
    pub fail_join: Mutex<bool>,
    pub fail_leave: Mutex<bool>,
    pub fail_publish: Mutex<Option<DeviceKind>>,
    pub joins: Mutex<Vec<JoinParams>>,
    pub renewals: Mutex<Vec<String>>,
    pub published: Mutex<Vec<DeviceHandle>>,
    pub played: Mutex<Vec<ParticipantId>>,
    pub leaves: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn join_count(&self) -> usize {
        self.joins.lock().unwrap().len()
    }

    pub fn leave_count(&self) -> usize {
        self.leaves.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TransportClient for FakeTransport {
    async fn join(&self, params: &JoinParams) -> Result<()> {
        self.joins.lock().unwrap().push(params.clone());
        if *self.fail_join.lock().unwrap() {
            bail!("invalid app id");
        }
        Ok(())
    }

    async fn renew_credential(&self, credential: &SessionCredential) -> Result<()> {
        self.renewals
            .lock()
            .unwrap()
            .push(credential.token().to_string());
        Ok(())
    }

    async fn leave(&self) -> Result<()> {
        self.leaves.fetch_add(1, Ordering::SeqCst);
        if *self.fail_leave.lock().unwrap() {
            bail!("connection reset");
        }
        Ok(())
    }

    async fn publish(&self, tracks: &[DeviceHandle]) -> Result<()> {
        let failing = *self.fail_publish.lock().unwrap();
        for track in tracks {
            if Some(track.kind) == failing {
                bail!("publish rejected");
            }
            self.published.lock().unwrap().push(track.clone());
        }
        Ok(())
    }

    fn play_remote_audio(&self, participant: &ParticipantId) -> Result<()> {
        self.played.lock().unwrap().push(participant.clone());
        Ok(())
    }
}

pub struct Harness {
    pub devices: Arc<FakeDevices>,
    pub fetcher: Arc<FakeFetcher>,
    pub transport: Arc<FakeTransport>,
    pub coordinator: Arc<SessionCoordinator>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(FakeDevices::new(), FakeFetcher::new(), FakeTransport::new())
    }

    pub fn with(
        devices: Arc<FakeDevices>,
        fetcher: Arc<FakeFetcher>,
        transport: Arc<FakeTransport>,
    ) -> Self {
        init_tracing();

        let coordinator = Arc::new(SessionCoordinator::new(
            SessionConfig::new(CHANNEL, APP_ID),
            fetcher.clone(),
            transport.clone(),
            Arc::new(DeviceManager::new(devices.clone())),
            Arc::new(ParticipantRegistry::new()),
        ));

        Self {
            devices,
            fetcher,
            transport,
            coordinator,
        }
    }

    /// Start and expect the session to reach `Joined`
    pub async fn joined() -> Self {
        let harness = Self::new();
        harness.coordinator.start().await.unwrap();
        harness
    }
}
