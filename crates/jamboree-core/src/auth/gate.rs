use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Unlock flag file name in cache directory
const GATE_FILE: &str = "gate.json";

/// How long an unlock lasts before the password is asked again.
const UNLOCK_HOURS: i64 = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateData {
    pub unlocked_at: DateTime<Utc>,
}

impl GateData {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.unlocked_at + Duration::hours(UNLOCK_HOURS)
    }

    /// Get hours remaining until the unlock lapses (for display)
    pub fn hours_remaining(&self) -> i64 {
        let expiry = self.unlocked_at + Duration::hours(UNLOCK_HOURS);
        (expiry - Utc::now()).num_hours().max(0)
    }
}

/// Hash a gate password into a PHC string for the config file.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {e}"))?;
    Ok(hash.to_string())
}

/// Check `password` against a PHC string. A malformed hash is an error,
/// a wrong password is `Ok(false)`.
pub fn verify_password(phc: &str, password: &str) -> Result<bool> {
    let parsed = PasswordHash::new(phc).map_err(|e| anyhow!("Invalid scout_gate_hash: {e}"))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Password gate in front of the scout page.
///
/// This keeps casual users of a shared machine out of the roster. It is not
/// access control: anyone who can reach the backend can read scouts.
pub struct ScoutGate {
    hash: Option<String>,
    cache_dir: PathBuf,
    pub data: Option<GateData>,
}

impl ScoutGate {
    pub fn new(hash: Option<String>, cache_dir: PathBuf) -> Self {
        let hash = hash.filter(|h| !h.trim().is_empty());
        if hash.is_none() {
            warn!("No scout_gate_hash configured, scout page is unprotected");
        }
        Self { hash, cache_dir, data: None }
    }

    /// Load a previous unlock from disk
    pub fn load(&mut self) -> Result<bool> {
        let path = self.gate_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path).context("Failed to read gate file")?;
            let data: GateData = serde_json::from_str(&contents).context("Failed to parse gate file")?;

            if !data.is_expired() {
                debug!(hours_left = data.hours_remaining(), "Scout page unlock restored");
                self.data = Some(data);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// True when the scout page may be shown.
    pub fn is_open(&self) -> bool {
        self.hash.is_none() || self.data.as_ref().map(|d| !d.is_expired()).unwrap_or(false)
    }

    pub fn requires_password(&self) -> bool {
        self.hash.is_some()
    }

    /// Try a password. On success the unlock is persisted.
    pub fn unlock(&mut self, password: &str) -> Result<bool> {
        let Some(hash) = &self.hash else {
            return Ok(true);
        };
        if !verify_password(hash, password)? {
            info!("Scout page password rejected");
            return Ok(false);
        }

        self.data = Some(GateData { unlocked_at: Utc::now() });
        self.save()?;
        info!("Scout page unlocked");
        Ok(true)
    }

    /// Forget the unlock, on disk too
    pub fn lock(&mut self) -> Result<()> {
        self.data = None;
        let path = self.gate_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.gate_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents).context("Failed to write gate file")?;
        }
        Ok(())
    }

    fn gate_path(&self) -> PathBuf {
        self.cache_dir.join(GATE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("campfire").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "campfire").unwrap());
        assert!(!verify_password(&hash, "Campfire").unwrap());
        assert!(verify_password("not a hash", "campfire").is_err());
    }

    #[test]
    fn test_gate_without_hash_is_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut gate = ScoutGate::new(None, dir.path().to_path_buf());
        assert!(gate.is_open());
        assert!(!gate.requires_password());
        assert!(gate.unlock("anything").unwrap());
        assert!(!dir.path().join(GATE_FILE).exists());
    }

    #[test]
    fn test_unlock_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let hash = hash_password("campfire").unwrap();

        let mut gate = ScoutGate::new(Some(hash.clone()), dir.path().to_path_buf());
        assert!(!gate.is_open());
        assert!(!gate.unlock("marshmallow").unwrap());
        assert!(!gate.is_open());
        assert!(gate.unlock("campfire").unwrap());
        assert!(gate.is_open());

        let mut again = ScoutGate::new(Some(hash), dir.path().to_path_buf());
        assert!(again.load().unwrap());
        assert!(again.is_open());

        again.lock().unwrap();
        assert!(!again.is_open());
        assert!(!dir.path().join(GATE_FILE).exists());
    }

    #[test]
    fn test_expired_unlock_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let stale = GateData { unlocked_at: Utc::now() - Duration::hours(UNLOCK_HOURS + 1) };
        assert!(stale.is_expired());
        assert_eq!(stale.hours_remaining(), 0);
        std::fs::write(dir.path().join(GATE_FILE), serde_json::to_string(&stale).unwrap()).unwrap();

        let mut gate = ScoutGate::new(Some(hash_password("campfire").unwrap()), dir.path().to_path_buf());
        assert!(!gate.load().unwrap());
        assert!(!gate.is_open());
    }
}
