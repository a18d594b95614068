// apps/storefront/src/services/sessions.rs

//! Per-client sessions. Each session owns the client's local store (guest cart
//! slot and bearer token) and one cart manager wired onto it.

use crate::errors::{AppError, Result};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use storefront_cart::{
  AuthState, CartEvent, CartManager, CartSettings, FileStore, KeyValueStore, LocalCartStore, MemoryStore,
  RemoteCartGateway,
};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub struct Session {
  pub id: Uuid,
  pub store: Arc<dyn KeyValueStore>,
  pub cart: CartManager,
  token_key: String,
  last_seen: Mutex<Instant>,
}

impl Session {
  fn touch(&self) {
    *self.last_seen.lock() = Instant::now();
  }

  pub fn idle_for(&self) -> Duration {
    self.last_seen.lock().elapsed()
  }

  /// Stores the bearer token and switches the cart to the user's server cart.
  #[instrument(name = "Session::sign_in", skip(self, token), fields(session_id = %self.id))]
  pub async fn sign_in(&self, token: &str, user_id: &str) -> Result<bool> {
    self.store.set(&self.token_key, token)?;
    Ok(self.cart.set_auth_state(AuthState::authenticated(user_id)).await)
  }

  /// Drops the bearer token and switches the cart back to the guest slot.
  #[instrument(name = "Session::sign_out", skip(self), fields(session_id = %self.id))]
  pub async fn sign_out(&self) -> Result<bool> {
    self.store.remove(&self.token_key)?;
    Ok(self.cart.set_auth_state(AuthState::Guest).await)
  }
}

pub struct SessionRegistry {
  sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
  client: reqwest::Client,
  settings: Arc<CartSettings>,
  data_dir: Option<PathBuf>,
}

impl SessionRegistry {
  pub fn new(settings: CartSettings, data_dir: Option<PathBuf>) -> Result<Self> {
    let client = RemoteCartGateway::build_client(&settings)?;
    Ok(Self {
      sessions: RwLock::new(HashMap::new()),
      client,
      settings: Arc::new(settings),
      data_dir,
    })
  }

  fn session_file(&self, id: Uuid) -> Option<PathBuf> {
    self.data_dir.as_ref().map(|dir| dir.join(format!("{}.json", id)))
  }

  fn open_store(&self, id: Uuid) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match self.session_file(id) {
      Some(path) => Arc::new(FileStore::open(path)?),
      None => Arc::new(MemoryStore::new()),
    };
    Ok(store)
  }

  async fn assemble(&self, id: Uuid, store: Arc<dyn KeyValueStore>) -> Arc<Session> {
    let local = LocalCartStore::new(store.clone(), self.settings.cart_key.clone());
    let remote = RemoteCartGateway::new(self.client.clone(), self.settings.clone(), store.clone());
    let cart = CartManager::new(local, remote);
    cart.observers().subscribe(move |event| match event {
      CartEvent::Changed { items } => debug!(session_id = %id, lines = items.len(), "Session cart changed."),
      CartEvent::Loading(loading) => debug!(session_id = %id, loading, "Session cart loading state."),
    });
    cart.reload().await;

    let session = Arc::new(Session {
      id,
      store,
      cart,
      token_key: self.settings.token_key.clone(),
      last_seen: Mutex::new(Instant::now()),
    });
    self.sessions.write().insert(id, session.clone());
    session
  }

  /// Starts a guest session with an empty local store.
  #[instrument(name = "SessionRegistry::create", skip(self))]
  pub async fn create(&self) -> Result<Arc<Session>> {
    let id = Uuid::new_v4();
    let store = self.open_store(id)?;
    let session = self.assemble(id, store).await;
    info!(session_id = %id, "Guest session created.");
    Ok(session)
  }

  /// Looks a session up, reopening it from its session file after a restart.
  #[instrument(name = "SessionRegistry::get", skip(self))]
  pub async fn get(&self, id: Uuid) -> Result<Arc<Session>> {
    if let Some(session) = self.sessions.read().get(&id).cloned() {
      session.touch();
      return Ok(session);
    }
    let path = self
      .session_file(id)
      .filter(|path| path.exists())
      .ok_or_else(|| AppError::Session(format!("Unknown session {}", id)))?;
    warn!(session_id = %id, path = %path.display(), "Restoring session from disk.");
    // A restored session starts as guest until the client signs in again.
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(path)?);
    Ok(self.assemble(id, store).await)
  }

  /// Ends a session: drops it from memory and deletes its session file.
  /// Returns false when nothing was known under `id`.
  #[instrument(name = "SessionRegistry::remove", skip(self))]
  pub fn remove(&self, id: Uuid) -> Result<bool> {
    let mut removed = self.sessions.write().remove(&id).is_some();
    if let Some(path) = self.session_file(id).filter(|path| path.exists()) {
      fs::remove_file(&path)
        .map_err(|e| AppError::Internal(format!("Failed to delete session file {}: {}", path.display(), e)))?;
      removed = true;
    }
    info!(session_id = %id, removed, "Session ended.");
    Ok(removed)
  }

  /// Drops sessions unused for at least `ttl`. File-backed sessions stay on
  /// disk and are restored by the next `get`.
  pub fn evict_idle(&self, ttl: Duration) -> usize {
    let mut sessions = self.sessions.write();
    let before = sessions.len();
    sessions.retain(|_, session| session.idle_for() < ttl);
    let evicted = before - sessions.len();
    if evicted > 0 {
      info!(evicted, remaining = sessions.len(), "Evicted idle sessions.");
    }
    evicted
  }

  pub fn len(&self) -> usize {
    self.sessions.read().len()
  }
}
