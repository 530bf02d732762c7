// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process signal transport for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::error::ProtocolError;
use crate::protocol::{Appliance, Signal, SignalTransport};

/// Records every fired signal together with the (virtual) time it started.
#[derive(Debug)]
pub(crate) struct FakeTransport {
    appliances: Vec<Appliance>,
    origin: Instant,
    sent: Mutex<Vec<(String, Duration)>>,
    list_calls: Mutex<usize>,
    send_latency: Duration,
    fail_sends: AtomicBool,
    list_gate: Option<Arc<Notify>>,
}

impl FakeTransport {
    /// One appliance `nickname` with a single `button` signal `sig-1`.
    pub(crate) fn with_button(nickname: &str, button: &str) -> Self {
        Self::with_appliances(vec![Appliance {
            id: Some("app-1".to_string()),
            nickname: nickname.to_string(),
            signals: vec![Signal {
                id: "sig-1".to_string(),
                name: button.to_string(),
            }],
        }])
    }

    pub(crate) fn with_appliances(appliances: Vec<Appliance>) -> Self {
        Self {
            appliances,
            origin: Instant::now(),
            sent: Mutex::new(Vec::new()),
            list_calls: Mutex::new(0),
            send_latency: Duration::ZERO,
            fail_sends: AtomicBool::new(false),
            list_gate: None,
        }
    }

    pub(crate) fn with_send_latency(mut self, latency: Duration) -> Self {
        self.send_latency = latency;
        self
    }

    /// Blocks `list_appliances` until the returned handle is notified.
    pub(crate) fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.list_gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.fail_sends.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    pub(crate) fn sent_at(&self) -> Vec<Duration> {
        self.sent.lock().iter().map(|(_, at)| *at).collect()
    }

    pub(crate) fn sent_ids(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(id, _)| id.clone()).collect()
    }

    pub(crate) fn list_calls(&self) -> usize {
        *self.list_calls.lock()
    }
}

impl SignalTransport for FakeTransport {
    async fn list_appliances(&self) -> Result<Vec<Appliance>, ProtocolError> {
        *self.list_calls.lock() += 1;
        if let Some(gate) = &self.list_gate {
            gate.notified().await;
        }
        Ok(self.appliances.clone())
    }

    async fn send_signal(&self, signal_id: &str) -> Result<(), ProtocolError> {
        self.sent
            .lock()
            .push((signal_id.to_string(), self.origin.elapsed()));
        if !self.send_latency.is_zero() {
            tokio::time::sleep(self.send_latency).await;
        }
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(ProtocolError::Status {
                status: 500,
                reason: "Internal Server Error".to_string(),
            });
        }
        Ok(())
    }
}
