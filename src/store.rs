use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calendar::{ActivityListing, ActivityRepository};
use crate::models::{Activity, StoreConfig, TrainingPlan, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("store file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Every collection the gym keeps, in insertion order.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collections {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub training_plans: Vec<TrainingPlan>,
}

impl Collections {
    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_mut(&mut self, id: Uuid) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub fn activity(&self, id: Uuid) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    pub fn activity_mut(&mut self, id: Uuid) -> Option<&mut Activity> {
        self.activities.iter_mut().find(|a| a.id == id)
    }

    pub fn training_plan(&self, id: Uuid) -> Option<&TrainingPlan> {
        self.training_plans.iter().find(|p| p.id == id)
    }

    pub fn training_plan_mut(&mut self, id: Uuid) -> Option<&mut TrainingPlan> {
        self.training_plans.iter_mut().find(|p| p.id == id)
    }

    /// Case-insensitive lookup, optionally ignoring one user (the one being edited).
    pub fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .iter()
            .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email))
    }
}

/// In-memory document store, optionally mirrored to a JSON file.
///
/// Reads share the lock. Mutations go through [`DocumentStore::update`], which
/// rewrites the file after the closure succeeds. A failing closure or a failing
/// write leaves the collections as they were.
pub struct DocumentStore {
    path: Option<PathBuf>,
    data: RwLock<Collections>,
}

impl DocumentStore {
    pub fn in_memory() -> Self {
        Self::with_collections(Collections::default())
    }

    pub fn with_collections(data: Collections) -> Self {
        Self {
            path: None,
            data: RwLock::new(data),
        }
    }

    /// Open the store at `path`; a file that does not exist yet means an empty store.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let data = match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collections::default(),
            Err(e) => return Err(e.into()),
        };
        info!(
            "Store: loaded {} users, {} activities, {} training plans from {}",
            data.users.len(),
            data.activities.len(),
            data.training_plans.len(),
            path.display()
        );
        Ok(Self {
            path: Some(path.to_path_buf()),
            data: RwLock::new(data),
        })
    }

    pub fn from_config(cfg: &StoreConfig) -> Result<Self, StoreError> {
        match &cfg.path {
            Some(path) => Self::open(path),
            None => {
                warn!("Store: no path configured, data will not survive a restart");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&Collections) -> R) -> R {
        let data = self.data.read().unwrap();
        f(&data)
    }

    /// Apply a mutation. Nothing is kept or persisted when `f` returns an error.
    pub fn update<R, E>(&self, f: impl FnOnce(&mut Collections) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let mut data = self.data.write().unwrap();
        let before = data.clone();
        let out = match f(&mut data) {
            Ok(out) => out,
            Err(e) => {
                *data = before;
                return Err(e);
            }
        };
        if let Err(e) = self.persist(&data) {
            *data = before;
            return Err(e.into());
        }
        Ok(out)
    }

    fn persist(&self, data: &Collections) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(data)?;
        std::fs::write(path, json)?;
        debug!("Store: saved to {}", path.display());
        Ok(())
    }
}

impl ActivityRepository for DocumentStore {
    fn fetch_all_with_trainer_names(&self) -> Result<Vec<ActivityListing>, StoreError> {
        self.read(|data| {
            let trainers: HashMap<Uuid, String> = data
                .users
                .iter()
                .map(|u| (u.id, u.display_name()))
                .collect();
            Ok(data
                .activities
                .iter()
                .map(|a| ActivityListing {
                    name: a.name.clone(),
                    trainer: trainers.get(&a.trainer).cloned(),
                    days: a.days.clone(),
                    schedule: a.schedule.clone(),
                })
                .collect())
        })
    }
}
