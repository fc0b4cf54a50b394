use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// The two storage scopes the storefront uses: `Session` mirrors the
/// browsing session (quote, selections, checkout data), `Local` outlives
/// it (auth token, user).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Session,
    Local,
}

impl Scope {
    fn file_name(self) -> &'static str {
        match self {
            Scope::Session => "session.json",
            Scope::Local => "local.json",
        }
    }
}

/// Storage backend injected into the session store. Persistence is a side
/// effect of store writes, never something flow code calls directly.
pub trait Persistence: Send + Sync {
    fn load(&self, scope: Scope) -> Option<String>;
    fn save(&self, scope: Scope, data: &str) -> io::Result<()>;
    fn clear(&self, scope: Scope) -> io::Result<()>;
}

/// Default backend: state lives only as long as the store itself.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    slots: Mutex<HashMap<Scope, String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self, scope: Scope) -> Option<String> {
        self.slots.lock().unwrap().get(&scope).cloned()
    }

    fn save(&self, scope: Scope, data: &str) -> io::Result<()> {
        self.slots.lock().unwrap().insert(scope, data.to_string());
        Ok(())
    }

    fn clear(&self, scope: Scope) -> io::Result<()> {
        self.slots.lock().unwrap().remove(&scope);
        Ok(())
    }
}

/// File backend for embedders that want state to survive a restart. One
/// JSON file per scope; no locking across processes (single-tab model).
#[derive(Debug)]
pub struct JsonFilePersistence {
    dir: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, scope: Scope) -> PathBuf {
        self.dir.join(scope.file_name())
    }
}

impl Persistence for JsonFilePersistence {
    fn load(&self, scope: Scope) -> Option<String> {
        fs::read_to_string(self.path(scope)).ok()
    }

    fn save(&self, scope: Scope, data: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(scope), data)
    }

    fn clear(&self, scope: Scope) -> io::Result<()> {
        match fs::remove_file(self.path(scope)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
