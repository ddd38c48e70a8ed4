use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info, warn};

use shared_models::{PanelError, Role};

use crate::session::Session;

/// Role tokens persisted to a small JSON file, keyed `aToken` / `dToken`, so
/// a new process picks up where the last one left off.
///
/// The two roles are independent: setting or clearing one never touches the
/// other. Changes made to the file by another process are only seen after
/// [`reload`](Self::reload).
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    tokens: RwLock<BTreeMap<String, String>>,
}

impl SessionStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PanelError> {
        let path = path.into();
        let tokens = read_tokens(&path)?;
        debug!("Opened session store at {} ({} token(s))", path.display(), tokens.len());

        Ok(Self {
            path,
            tokens: RwLock::new(tokens),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn token(&self, role: Role) -> Option<String> {
        self.tokens
            .read()
            .ok()
            .and_then(|tokens| tokens.get(role.token_key()).cloned())
    }

    /// Token for `role`, or [`PanelError::NotAuthenticated`] when none is held.
    pub fn require(&self, role: Role) -> Result<String, PanelError> {
        self.token(role).ok_or(PanelError::NotAuthenticated(role))
    }

    pub fn has(&self, role: Role) -> bool {
        self.token(role).is_some()
    }

    /// Persist `token` for `role`. Memory is only updated once the file
    /// write succeeded.
    pub fn set(&self, role: Role, token: &str) -> Result<(), PanelError> {
        if token.trim().is_empty() {
            return Err(PanelError::Auth(format!("Backend returned an empty {} token", role)));
        }

        let mut tokens = self.write_lock()?;
        let mut next = tokens.clone();
        next.insert(role.token_key().to_string(), token.to_string());
        write_tokens(&self.path, &next)?;
        *tokens = next;

        info!("{} session stored", role);
        Ok(())
    }

    /// Drop the token for `role`. Returns whether one was held; clearing an
    /// absent token is a no-op that does not touch the file.
    pub fn clear(&self, role: Role) -> Result<bool, PanelError> {
        let mut tokens = self.write_lock()?;
        if !tokens.contains_key(role.token_key()) {
            return Ok(false);
        }

        let mut next = tokens.clone();
        next.remove(role.token_key());
        write_tokens(&self.path, &next)?;
        *tokens = next;

        info!("{} session cleared", role);
        Ok(true)
    }

    /// Clear every held token, returning the roles that were logged out.
    pub fn clear_all(&self) -> Result<Vec<Role>, PanelError> {
        let mut cleared = Vec::new();
        for role in Role::ALL {
            if self.clear(role)? {
                cleared.push(role);
            }
        }
        Ok(cleared)
    }

    /// The session the shell acts as. Admin wins when both tokens are held.
    pub fn session(&self) -> Session {
        if let Some(token) = self.token(Role::Admin) {
            Session::Admin(token)
        } else if let Some(token) = self.token(Role::Doctor) {
            Session::Doctor(token)
        } else {
            Session::Anonymous
        }
    }

    /// Re-read the backing file, picking up external edits or removal.
    pub fn reload(&self) -> Result<(), PanelError> {
        let fresh = read_tokens(&self.path)?;
        *self.write_lock()? = fresh;
        Ok(())
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<String, String>>, PanelError> {
        self.tokens
            .write()
            .map_err(|_| PanelError::Storage("session lock poisoned".to_string()))
    }
}

fn read_tokens(path: &Path) -> Result<BTreeMap<String, String>, PanelError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(e.into()),
    };

    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
        Ok(tokens) => Ok(tokens
            .into_iter()
            .filter(|(key, token)| {
                Role::ALL.iter().any(|r| r.token_key() == key) && !token.is_empty()
            })
            .collect()),
        Err(e) => {
            warn!("Ignoring unreadable session file {}: {}", path.display(), e);
            Ok(BTreeMap::new())
        }
    }
}

fn write_tokens(path: &Path, tokens: &BTreeMap<String, String>) -> Result<(), PanelError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let body = serde_json::to_string_pretty(tokens)?;
    fs::write(path, body)?;
    restrict_permissions(path);
    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        warn!("Could not restrict permissions on {}: {}", path.display(), e);
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}
