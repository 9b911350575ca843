// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: a mock Kubernetes API, an in-memory cluster and a
//! recording command runner.

use crate::claims::claim_key;
use crate::error::{MigrateError, Result};
use crate::exec::{CommandLine, CommandRunner};
use crate::kubernetes::ClaimStore;
use async_trait::async_trait;
use http::{Request, Response};
use k8s_openapi::api::core::v1::{PersistentVolumeClaim, PersistentVolumeClaimSpec};
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::Client;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(("GET".to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(("POST".to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Requests received so far, as `METHOD path?query`
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        self.responses
            .lock()
            .unwrap()
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let path_and_query = req
            .uri()
            .path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_else(|| path.clone());
        self.requests
            .lock()
            .unwrap()
            .push(format!("{} {}", method, path_and_query));

        let response = self.find_response(&method, &path);

        Box::pin(async move {
            let (status, body) = response.unwrap_or_else(|| (404, not_found_json("resource", &path)));
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Create a PersistentVolumeClaimList JSON response
pub fn claim_list_json(claims: &[PersistentVolumeClaim]) -> String {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "PersistentVolumeClaimList",
        "metadata": { "resourceVersion": "1" },
        "items": claims,
    })
    .to_string()
}

/// Create a StorageClass JSON response with a fileSystemId parameter
pub fn storage_class_json(name: &str, filesystem_id: &str) -> String {
    serde_json::json!({
        "apiVersion": "storage.k8s.io/v1",
        "kind": "StorageClass",
        "metadata": { "name": name },
        "provisioner": "efs.csi.aws.com",
        "parameters": {
            "provisioningMode": "efs-ap",
            "fileSystemId": filesystem_id
        }
    })
    .to_string()
}

/// Build a claim; empty `storage_class` or `volume` leave the field unset
pub fn claim(namespace: &str, name: &str, storage_class: &str, volume: &str) -> PersistentVolumeClaim {
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

    PersistentVolumeClaim {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: Some(PersistentVolumeClaimSpec {
            access_modes: Some(vec!["ReadWriteMany".to_string()]),
            storage_class_name: non_empty(storage_class),
            volume_name: non_empty(volume),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[derive(Default)]
struct FakeState {
    visible: Vec<PersistentVolumeClaim>,
    /// Created claims not yet listed, with the listings left until they show up
    pending: BTreeMap<String, (PersistentVolumeClaim, usize)>,
    created: Vec<PersistentVolumeClaim>,
    dry_run_creates: usize,
    list_calls: usize,
}

/// An in-memory cluster.
///
/// Created claims show up in listings after a configurable number of list
/// calls (immediately by default, never with `None`), optionally bound to a
/// fixed volume name.
pub struct FakeCluster {
    state: Mutex<FakeState>,
    storage_classes: BTreeMap<String, BTreeMap<String, String>>,
    visibility_delay: Option<usize>,
    bound_volume: Option<String>,
}

impl FakeCluster {
    pub fn new(claims: Vec<PersistentVolumeClaim>) -> Self {
        Self {
            state: Mutex::new(FakeState {
                visible: claims,
                ..Default::default()
            }),
            storage_classes: BTreeMap::new(),
            visibility_delay: Some(0),
            bound_volume: None,
        }
    }

    pub fn with_storage_class(mut self, name: &str, filesystem_id: &str) -> Self {
        self.storage_classes.insert(
            name.to_string(),
            BTreeMap::from([("fileSystemId".to_string(), filesystem_id.to_string())]),
        );
        self
    }

    pub fn with_visibility_delay(mut self, delay: Option<usize>) -> Self {
        self.visibility_delay = delay;
        self
    }

    pub fn with_bound_volume(mut self, volume: &str) -> Self {
        self.bound_volume = Some(volume.to_string());
        self
    }

    /// Claims passed to non-dry-run creates, as submitted
    pub fn created(&self) -> Vec<PersistentVolumeClaim> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn dry_run_creates(&self) -> usize {
        self.state.lock().unwrap().dry_run_creates
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }
}

#[async_trait]
impl ClaimStore for FakeCluster {
    async fn list_claims(&self) -> Result<Vec<PersistentVolumeClaim>> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;

        let pending = std::mem::take(&mut state.pending);
        for (key, (mut claim, remaining)) in pending {
            if remaining > 0 {
                state.pending.insert(key, (claim, remaining - 1));
                continue;
            }
            if let (Some(volume), Some(spec)) = (&self.bound_volume, claim.spec.as_mut()) {
                spec.volume_name = Some(volume.clone());
            }
            state.visible.push(claim);
        }

        Ok(state.visible.clone())
    }

    async fn create_claim(
        &self,
        namespace: &str,
        claim: &PersistentVolumeClaim,
        dry_run: bool,
    ) -> Result<PersistentVolumeClaim> {
        let mut state = self.state.lock().unwrap();
        if dry_run {
            state.dry_run_creates += 1;
            return Ok(claim.clone());
        }

        let mut stored = claim.clone();
        stored.metadata.namespace = Some(namespace.to_string());
        state.created.push(claim.clone());
        if let Some(delay) = self.visibility_delay {
            state
                .pending
                .entry(claim_key(&stored))
                .or_insert((stored.clone(), delay));
        }

        Ok(stored)
    }

    async fn storage_class_parameters(&self, name: &str) -> Result<BTreeMap<String, String>> {
        self.storage_classes.get(name).cloned().ok_or_else(|| {
            MigrateError::StorageClassError {
                storage_class: name.to_string(),
                source: kube::Error::Api(kube::error::ErrorResponse {
                    status: "Failure".to_string(),
                    message: format!("storageclasses.storage.k8s.io \"{}\" not found", name),
                    reason: "NotFound".to_string(),
                    code: 404,
                }),
            }
        })
    }
}

/// Records every command instead of running it, optionally failing one program
pub struct RecordingRunner {
    commands: Mutex<Vec<CommandLine>>,
    fail_program: Option<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            fail_program: None,
        }
    }

    pub fn failing_on(program: &str) -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            fail_program: Some(program.to_string()),
        }
    }

    pub fn commands(&self) -> Vec<CommandLine> {
        self.commands.lock().unwrap().clone()
    }
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &CommandLine) -> Result<()> {
        self.commands.lock().unwrap().push(command.clone());

        if self.fail_program.as_deref() == Some(command.program.as_str()) {
            return Err(MigrateError::CommandFailed {
                command: command.to_string(),
                reason: "exit status 1".to_string(),
            });
        }
        Ok(())
    }
}
