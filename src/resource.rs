//! Result-resource handles.
//!
//! The browser held rendered output behind a revocable object URL; here the
//! bytes live behind a `ResourceHandle` issued by a `ResourceStore`. The
//! store enforces the lifecycle invariant: at most one live handle at a
//! time, the previous handle is always revoked before a new one is created,
//! and everything is released when the store is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use base64::Engine as Base64Engine;
use sha2::{Digest, Sha256};

struct HandleInner {
    id: String,
    media_type: String,
    bytes: Vec<u8>,
    revoked: AtomicBool,
}

/// A revocable reference to one rendered output.
///
/// Clones share the same underlying resource; revoking any clone revokes
/// them all. A revoked handle keeps its id for diagnostics but must no
/// longer be displayed or downloaded.
#[derive(Clone)]
pub struct ResourceHandle {
    inner: Arc<HandleInner>,
}

impl ResourceHandle {
    fn new(id: String, media_type: String, bytes: Vec<u8>) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                id,
                media_type,
                bytes,
                revoked: AtomicBool::new(false),
            }),
        }
    }

    /// Stable identifier, in the shape `blob:cardform/<seq>-<digest>`.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn media_type(&self) -> &str {
        &self.inner.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.inner.bytes
    }

    pub fn is_revoked(&self) -> bool {
        self.inner.revoked.load(Ordering::SeqCst)
    }

    fn revoke(&self) {
        self.inner.revoked.store(true, Ordering::SeqCst);
    }

    /// Encode the resource as a `data:` URL, the way surfaces without object
    /// URLs can still display it.
    pub fn to_data_url(&self) -> String {
        let encoded =
            Base64Engine::encode(&base64::engine::general_purpose::STANDARD, &self.inner.bytes);
        format!("data:{};base64,{}", self.inner.media_type, encoded)
    }
}

impl std::fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("id", &self.inner.id)
            .field("media_type", &self.inner.media_type)
            .field("len", &self.inner.bytes.len())
            .field("revoked", &self.is_revoked())
            .finish()
    }
}

/// Owner of the single active result resource.
pub struct ResourceStore {
    active: Option<ResourceHandle>,
    seq: u64,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self {
            active: None,
            seq: 0,
        }
    }

    /// Revoke the active handle, then create and retain a new one. The
    /// ordering is the leak guard: there is never a moment with two live
    /// handles.
    pub fn replace(&mut self, bytes: Vec<u8>, media_type: &str) -> ResourceHandle {
        self.revoke_active();
        self.seq += 1;

        let digest = Sha256::digest(&bytes);
        let id = format!(
            "blob:cardform/{}-{}",
            self.seq,
            &hex::encode(digest)[..12]
        );
        let handle = ResourceHandle::new(id, media_type.to_string(), bytes);
        self.active = Some(handle.clone());
        handle
    }

    /// Revoke and drop the active handle, if any.
    pub fn revoke_active(&mut self) {
        if let Some(handle) = self.active.take() {
            log::debug!("revoking result resource {}", handle.id());
            handle.revoke();
        }
    }

    /// Currently live handle, if any.
    pub fn active(&self) -> Option<&ResourceHandle> {
        self.active.as_ref()
    }

    /// Number of live handles (0 or 1 by construction).
    pub fn live_count(&self) -> usize {
        usize::from(self.active.is_some())
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ResourceStore {
    fn drop(&mut self) {
        // The unload path: nothing outlives the store un-revoked.
        self.revoke_active();
    }
}
