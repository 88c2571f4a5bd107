use crate::social_client::error::ClientError;
use oauth2::AccessToken;
use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

/// The single slot the bearer token lives in between runs.
pub trait TokenStore: Debug + Send + Sync {
    fn load(&self) -> Result<Option<AccessToken>, ClientError>;
    fn save(&self, token: &AccessToken) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<AccessToken>, ClientError> {
        let access_token = match fs::read_to_string(&self.path) {
            Ok(access_token) => access_token,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let access_token = serde_json::from_str(&access_token)?;
        Ok(Some(access_token))
    }

    fn save(&self, token: &AccessToken) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let access_token = serde_json::to_string(token)?;
        fs::write(&self.path, access_token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<AccessToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            slot: Mutex::new(Some(AccessToken::new(token.to_string()))),
        }
    }
}

// NB: a poisoned slot still holds a valid Option, so recover it rather than fail.
impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<AccessToken>, ClientError> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        Ok(slot.clone())
    }

    fn save(&self, token: &AccessToken) -> Result<(), ClientError> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
        Ok(())
    }
}
