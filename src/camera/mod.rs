//! Camera resource handle
//!
//! Device acquisition itself belongs to a `CameraBackend`. The handle owns the
//! lifecycle (start/stop), the current status, and the observers that want to
//! hear about status changes. It is cheap to clone and shared between the
//! gesture pipeline and whoever drives the UI.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum CameraStatus {
    Inactive,
    Active,
    Failed(String),
}

/// Device acquisition failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("No camera device found")]
    NotFound,

    #[error("Camera is in use by another application")]
    Busy,

    #[error("Camera does not support the requested settings")]
    Overconstrained,

    #[error("Camera access requires a secure context")]
    Insecure,

    #[error("Camera start was aborted")]
    Aborted,

    #[error("Camera error: {0}")]
    Other(String),
}

/// The device side of the camera
pub trait CameraBackend: Send {
    fn acquire(&mut self) -> Result<(), CameraError>;
    fn release(&mut self);
}

/// Backend for headless runs where frames arrive from elsewhere
#[derive(Debug, Default)]
pub struct NullBackend;

impl CameraBackend for NullBackend {
    fn acquire(&mut self) -> Result<(), CameraError> {
        Ok(())
    }

    fn release(&mut self) {}
}

pub type ListenerId = u64;

type Listener = Arc<dyn Fn(&CameraStatus) + Send + Sync>;

struct Inner {
    backend: Box<dyn CameraBackend>,
    status: CameraStatus,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: ListenerId,
}

#[derive(Clone)]
pub struct CameraHandle {
    inner: Arc<Mutex<Inner>>,
}

impl CameraHandle {
    pub fn new(backend: Box<dyn CameraBackend>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                backend,
                status: CameraStatus::Inactive,
                listeners: Vec::new(),
                next_listener: 1,
            })),
        }
    }

    pub fn null() -> Self {
        Self::new(Box::new(NullBackend))
    }

    pub fn status(&self) -> CameraStatus {
        self.inner.lock().status.clone()
    }

    pub fn is_active(&self) -> bool {
        self.inner.lock().status == CameraStatus::Active
    }

    /// Acquire the device. Starting an active camera is a no-op.
    pub fn start(&self) -> Result<(), CameraError> {
        let result = {
            let mut inner = self.inner.lock();
            if inner.status == CameraStatus::Active {
                return Ok(());
            }
            inner.backend.acquire()
        };

        match &result {
            Ok(()) => {
                info!("Camera started");
                self.set_status(CameraStatus::Active);
            }
            Err(e) => {
                warn!(error = %e, "Camera failed to start");
                self.set_status(CameraStatus::Failed(e.to_string()));
            }
        }
        result
    }

    /// Release the device. Stopping an inactive camera is a no-op.
    pub fn stop(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.status != CameraStatus::Active {
                return;
            }
            inner.backend.release();
        }
        info!("Camera stopped");
        self.set_status(CameraStatus::Inactive);
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&CameraStatus) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock();
        let id = inner.next_listener;
        inner.next_listener += 1;
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
        inner.listeners.len() != before
    }

    fn set_status(&self, status: CameraStatus) {
        // Listeners run outside the lock so they may call back into the handle
        let listeners: Vec<Listener> = {
            let mut inner = self.inner.lock();
            inner.status = status.clone();
            inner.listeners.iter().map(|(_, l)| l.clone()).collect()
        };
        for listener in listeners {
            listener(&status);
        }
    }
}

impl std::fmt::Debug for CameraHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraHandle")
            .field("status", &self.status())
            .finish()
    }
}
