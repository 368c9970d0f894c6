//! Implements SessionStore with an encrypted blob on disk.
//!
//! One versioned, namespaced envelope holding the XChaCha20-Poly1305
//! ciphertext of the session state. The key is derived from an externally
//! supplied secret; rehydration fails closed (default unchecked state) on
//! any decryption, version, or parse problem.

use crate::domain::{DomainError, SessionState};
use crate::ports::SessionStore;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Storage namespace; a blob from another application is rejected.
const NAMESPACE: &str = "wholesale_admin";

/// Blob format version. A mismatch resets to the default state.
const VERSION: u32 = 1;

const NONCE_LEN: usize = 24;

/// On-disk envelope around the ciphertext.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    namespace: String,
    version: u32,
    nonce: String,
    ciphertext: String,
}

/// Encrypted session blob storage.
pub struct SessionFile {
    path: PathBuf,
    key: [u8; 32],
}

impl SessionFile {
    /// `secret` is externally supplied configuration (WSADMIN_SESSION_SECRET);
    /// it is hashed into the cipher key and never stored.
    pub fn new(path: impl AsRef<Path>, secret: &str) -> Self {
        let key: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
        Self {
            path: path.as_ref().to_path_buf(),
            key,
        }
    }

    fn cipher(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new(Key::from_slice(&self.key))
    }

    fn decrypt(&self, envelope: &Envelope) -> Option<SessionState> {
        if envelope.namespace != NAMESPACE {
            warn!(namespace = %envelope.namespace, "session blob from another namespace; ignoring");
            return None;
        }
        if envelope.version != VERSION {
            warn!(
                found = envelope.version,
                expected = VERSION,
                "session blob version changed; resetting"
            );
            return None;
        }
        let nonce = BASE64.decode(&envelope.nonce).ok()?;
        if nonce.len() != NONCE_LEN {
            return None;
        }
        let ciphertext = BASE64.decode(&envelope.ciphertext).ok()?;
        let plaintext = self
            .cipher()
            .decrypt(XNonce::from_slice(&nonce), ciphertext.as_slice())
            .ok()?;
        serde_json::from_slice(&plaintext).ok()
    }

    fn encrypt(&self, state: &SessionState) -> Result<Envelope, DomainError> {
        let plaintext = serde_json::to_vec(state)
            .map_err(|e| DomainError::Session(format!("serialize state: {}", e)))?;
        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);
        let ciphertext = self
            .cipher()
            .encrypt(XNonce::from_slice(&nonce), plaintext.as_slice())
            .map_err(|e| DomainError::Session(format!("encrypt state: {}", e)))?;
        Ok(Envelope {
            namespace: NAMESPACE.to_string(),
            version: VERSION,
            nonce: BASE64.encode(nonce),
            ciphertext: BASE64.encode(ciphertext),
        })
    }

    /// Atomic save using write-replace: temp file, sync_all, rename.
    async fn write_atomic(&self, json: &str) -> Result<(), DomainError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| DomainError::Session(format!("create data dir: {}", e)))?;
        }
        let temp_path = self.path.with_extension("enc.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Session(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::Session(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Session(format!("sync temp file: {}", e)))?;
        drop(f);
        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::Session(format!("atomic rename failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionStore for SessionFile {
    async fn load(&self) -> SessionState {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(_) => return SessionState::default(),
        };
        let envelope: Envelope = match serde_json::from_str(&raw) {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "session blob is not a valid envelope; starting fresh");
                return SessionState::default();
            }
        };
        match self.decrypt(&envelope) {
            Some(state) => state,
            None => {
                warn!("session blob could not be decrypted; starting fresh");
                SessionState::default()
            }
        }
    }

    async fn save(&self, state: &SessionState) -> Result<(), DomainError> {
        let envelope = self.encrypt(state)?;
        let json = serde_json::to_string_pretty(&envelope)
            .map_err(|e| DomainError::Session(format!("serialize envelope: {}", e)))?;
        self.write_atomic(&json).await
    }

    async fn reset(&self) -> Result<(), DomainError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Session(format!("remove blob: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AdminUser;

    fn logged_in_state() -> SessionState {
        SessionState {
            user: Some(AdminUser {
                id: "u1".into(),
                name: "Ada".into(),
                email: "ada@example.com".into(),
                role: "admin".into(),
            }),
            is_logged_in: true,
            is_initialized: true,
        }
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionFile::new(dir.path().join("session.enc"), "secret");

        store.save(&logged_in_state()).await.unwrap();
        let loaded = store.load().await;

        assert!(loaded.is_logged_in);
        assert!(loaded.is_initialized);
        assert_eq!(loaded.user.unwrap().email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionFile::new(dir.path().join("session.enc"), "secret");

        let loaded = store.load().await;
        assert!(!loaded.is_logged_in);
        assert!(!loaded.is_initialized);
    }

    #[tokio::test]
    async fn test_wrong_secret_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.enc");

        SessionFile::new(&path, "right-secret")
            .save(&logged_in_state())
            .await
            .unwrap();
        let loaded = SessionFile::new(&path, "wrong-secret").load().await;

        assert!(!loaded.is_logged_in);
        assert!(!loaded.is_initialized);
    }

    #[tokio::test]
    async fn test_tampered_ciphertext_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.enc");
        let store = SessionFile::new(&path, "secret");
        store.save(&logged_in_state()).await.unwrap();

        let mut envelope: Envelope =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let mut bytes = BASE64.decode(&envelope.ciphertext).unwrap();
        bytes[0] ^= 0xff;
        envelope.ciphertext = BASE64.encode(bytes);
        std::fs::write(&path, serde_json::to_string(&envelope).unwrap()).unwrap();

        let loaded = store.load().await;
        assert!(!loaded.is_logged_in);
    }

    #[tokio::test]
    async fn test_version_change_resets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.enc");
        let store = SessionFile::new(&path, "secret");
        store.save(&logged_in_state()).await.unwrap();

        let mut envelope: Envelope =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        envelope.version = VERSION + 1;
        std::fs::write(&path, serde_json::to_string(&envelope).unwrap()).unwrap();

        let loaded = store.load().await;
        assert!(!loaded.is_initialized);
    }

    #[tokio::test]
    async fn test_reset_removes_blob() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.enc");
        let store = SessionFile::new(&path, "secret");
        store.save(&logged_in_state()).await.unwrap();

        store.reset().await.unwrap();
        assert!(!path.exists());
        // Resetting an already-missing blob is fine.
        store.reset().await.unwrap();

        let loaded = store.load().await;
        assert!(!loaded.is_initialized);
    }
}
