// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! Storage abstraction with flat-file and in-memory implementations.
//!
//! The core only talks to [`CredentialStore`] and [`RecordStore`]; any
//! backend that satisfies them can be plugged in.
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use hospital_common::{Doctor, DoctorCreate, Patient, PatientCreate, RecordId};
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs as tokio_fs, sync::Mutex};

use crate::error::AppError;

/// Stored admin account
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredential {
    pub id: RecordId,
    pub username: String,
    /// bcrypt hash, never the plaintext
    pub password_hash: String,
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredential")
            .field("id", &self.id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Admin credential lookups and inserts
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find an admin by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminCredential>, AppError>;

    /// Insert a new admin. Fails with `DuplicateUsername` if the name is taken.
    async fn insert_admin(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<AdminCredential, AppError>;
}

/// Patient and doctor tables
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Check the backend is reachable
    async fn ping(&self) -> Result<(), AppError>;

    async fn create_patient(&self, patient: PatientCreate) -> Result<Patient, AppError>;

    async fn get_patient(&self, id: RecordId) -> Result<Patient, AppError>;

    /// First `limit` patients by ascending id
    async fn list_patients(&self, limit: usize) -> Result<Vec<Patient>, AppError>;

    async fn update_patient(&self, id: RecordId, patient: PatientCreate)
        -> Result<Patient, AppError>;

    /// With `name` set, the row is only removed when its name matches
    async fn delete_patient(&self, id: RecordId, name: Option<&str>)
        -> Result<Patient, AppError>;

    async fn create_doctor(&self, doctor: DoctorCreate) -> Result<Doctor, AppError>;

    async fn get_doctor(&self, id: RecordId) -> Result<Doctor, AppError>;

    async fn update_doctor(&self, id: RecordId, doctor: DoctorCreate) -> Result<Doctor, AppError>;

    async fn delete_doctor(&self, id: RecordId) -> Result<Doctor, AppError>;
}

/// Everything the HTTP layer needs from a backend
pub trait Storage: CredentialStore + RecordStore + Clone + 'static {}

impl<T> Storage for T where T: CredentialStore + RecordStore + Clone + 'static {}

/// One table: rows by id plus the id sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Table<T> {
    next_id: RecordId,
    rows: BTreeMap<RecordId, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    /// Ids start at 1 and are never reused
    fn insert_with(&mut self, make: impl FnOnce(RecordId) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = make(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: RecordId) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn replace(&mut self, id: RecordId, row: T) -> Option<T> {
        let slot = self.rows.get_mut(&id)?;
        *slot = row.clone();
        Some(row)
    }

    fn remove(&mut self, id: RecordId) -> Option<T> {
        self.rows.remove(&id)
    }

    fn first(&self, limit: usize) -> Vec<T> {
        self.rows.values().take(limit).cloned().collect()
    }
}

fn remove_patient(
    table: &mut Table<Patient>,
    id: RecordId,
    name: Option<&str>,
) -> Result<Patient, AppError> {
    let stored = table.rows.get(&id).ok_or_else(|| patient_not_found(id))?;
    if let Some(name) = name {
        if stored.name != name {
            return Err(AppError::NotFound(format!(
                "Patient {id} with name '{name}' not found in database"
            )));
        }
    }
    table.remove(id).ok_or_else(|| patient_not_found(id))
}

fn patient_not_found(id: RecordId) -> AppError {
    AppError::NotFound(format!("Patient {id} not found in database"))
}

fn doctor_not_found(id: RecordId) -> AppError {
    AppError::NotFound(format!("Doctor {id} not found in database"))
}

// ---------------------------------------------------------------------------
// Flat files
// ---------------------------------------------------------------------------

const ADMINS_FILE: &str = "admins.json";
const PATIENTS_FILE: &str = "patients.json";
const DOCTORS_FILE: &str = "doctors.json";

/// JSON document on disk, one writer at a time
#[derive(Clone)]
struct TableFile {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl TableFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Arc::new(Mutex::new(())),
        }
    }

    async fn read<T: DeserializeOwned>(&self) -> Result<Table<T>, AppError> {
        if !tokio_fs::try_exists(&self.path).await? {
            return Ok(Table::default());
        }
        let content = tokio_fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Table::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn write<T: Serialize>(&self, table: &Table<T>) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(table)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read, mutate and write back under the table lock
    async fn update<T, R>(
        &self,
        apply: impl FnOnce(&mut Table<T>) -> Result<R, AppError> + Send,
    ) -> Result<R, AppError>
    where
        T: Serialize + DeserializeOwned + Send,
        R: Send,
    {
        let _guard = self.lock.lock().await;
        let mut table = self.read::<T>().await?;
        let result = apply(&mut table)?;
        self.write(&table).await?;
        Ok(result)
    }

    async fn snapshot<T: DeserializeOwned>(&self) -> Result<Table<T>, AppError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }
}

/// Flat-file implementation of the storage traits
#[derive(Clone)]
pub struct FlatFileStorage {
    root: PathBuf,
    admins: TableFile,
    patients: TableFile,
    doctors: TableFile,
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            admins: TableFile::new(root.join(ADMINS_FILE)),
            patients: TableFile::new(root.join(PATIENTS_FILE)),
            doctors: TableFile::new(root.join(DOCTORS_FILE)),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl CredentialStore for FlatFileStorage {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminCredential>, AppError> {
        let table = self.admins.snapshot::<AdminCredential>().await?;
        Ok(table
            .rows
            .into_values()
            .find(|admin| admin.username == username))
    }

    async fn insert_admin(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<AdminCredential, AppError> {
        self.admins
            .update(|table: &mut Table<AdminCredential>| {
                if table.rows.values().any(|admin| admin.username == username) {
                    return Err(AppError::DuplicateUsername);
                }
                Ok(table.insert_with(|id| AdminCredential {
                    id,
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                }))
            })
            .await
    }
}

#[async_trait]
impl RecordStore for FlatFileStorage {
    async fn ping(&self) -> Result<(), AppError> {
        let metadata = tokio_fs::metadata(&self.root).await?;
        if !metadata.is_dir() {
            return Err(AppError::Internal(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }
        Ok(())
    }

    async fn create_patient(&self, patient: PatientCreate) -> Result<Patient, AppError> {
        self.patients
            .update(|table: &mut Table<Patient>| {
                Ok(table.insert_with(|id| patient.into_patient(id)))
            })
            .await
    }

    async fn get_patient(&self, id: RecordId) -> Result<Patient, AppError> {
        self.patients
            .snapshot::<Patient>()
            .await?
            .get(id)
            .ok_or_else(|| patient_not_found(id))
    }

    async fn list_patients(&self, limit: usize) -> Result<Vec<Patient>, AppError> {
        Ok(self.patients.snapshot::<Patient>().await?.first(limit))
    }

    async fn update_patient(
        &self,
        id: RecordId,
        patient: PatientCreate,
    ) -> Result<Patient, AppError> {
        self.patients
            .update(|table: &mut Table<Patient>| {
                table
                    .replace(id, patient.into_patient(id))
                    .ok_or_else(|| patient_not_found(id))
            })
            .await
    }

    async fn delete_patient(
        &self,
        id: RecordId,
        name: Option<&str>,
    ) -> Result<Patient, AppError> {
        self.patients
            .update(|table: &mut Table<Patient>| remove_patient(table, id, name))
            .await
    }

    async fn create_doctor(&self, doctor: DoctorCreate) -> Result<Doctor, AppError> {
        self.doctors
            .update(|table: &mut Table<Doctor>| Ok(table.insert_with(|id| doctor.into_doctor(id))))
            .await
    }

    async fn get_doctor(&self, id: RecordId) -> Result<Doctor, AppError> {
        self.doctors
            .snapshot::<Doctor>()
            .await?
            .get(id)
            .ok_or_else(|| doctor_not_found(id))
    }

    async fn update_doctor(&self, id: RecordId, doctor: DoctorCreate) -> Result<Doctor, AppError> {
        self.doctors
            .update(|table: &mut Table<Doctor>| {
                table
                    .replace(id, doctor.into_doctor(id))
                    .ok_or_else(|| doctor_not_found(id))
            })
            .await
    }

    async fn delete_doctor(&self, id: RecordId) -> Result<Doctor, AppError> {
        self.doctors
            .update(|table: &mut Table<Doctor>| {
                table.remove(id).ok_or_else(|| doctor_not_found(id))
            })
            .await
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

/// In-memory implementation of the storage traits, used by tests
#[derive(Clone, Default)]
pub struct MemoryStorage {
    admins: Arc<DashMap<String, AdminCredential>>,
    admin_ids: Arc<parking_lot::Mutex<RecordId>>,
    patients: Arc<RwLock<Table<Patient>>>,
    doctors: Arc<RwLock<Table<Doctor>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStorage {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminCredential>, AppError> {
        Ok(self.admins.get(username).map(|entry| entry.value().clone()))
    }

    async fn insert_admin(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<AdminCredential, AppError> {
        match self.admins.entry(username.to_string()) {
            Entry::Occupied(_) => Err(AppError::DuplicateUsername),
            Entry::Vacant(slot) => {
                let id = {
                    let mut last = self.admin_ids.lock();
                    *last += 1;
                    *last
                };
                let admin = AdminCredential {
                    id,
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                };
                slot.insert(admin.clone());
                Ok(admin)
            }
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStorage {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_patient(&self, patient: PatientCreate) -> Result<Patient, AppError> {
        Ok(self
            .patients
            .write()
            .insert_with(|id| patient.into_patient(id)))
    }

    async fn get_patient(&self, id: RecordId) -> Result<Patient, AppError> {
        self.patients
            .read()
            .get(id)
            .ok_or_else(|| patient_not_found(id))
    }

    async fn list_patients(&self, limit: usize) -> Result<Vec<Patient>, AppError> {
        Ok(self.patients.read().first(limit))
    }

    async fn update_patient(
        &self,
        id: RecordId,
        patient: PatientCreate,
    ) -> Result<Patient, AppError> {
        self.patients
            .write()
            .replace(id, patient.into_patient(id))
            .ok_or_else(|| patient_not_found(id))
    }

    async fn delete_patient(
        &self,
        id: RecordId,
        name: Option<&str>,
    ) -> Result<Patient, AppError> {
        remove_patient(&mut self.patients.write(), id, name)
    }

    async fn create_doctor(&self, doctor: DoctorCreate) -> Result<Doctor, AppError> {
        Ok(self.doctors.write().insert_with(|id| doctor.into_doctor(id)))
    }

    async fn get_doctor(&self, id: RecordId) -> Result<Doctor, AppError> {
        self.doctors
            .read()
            .get(id)
            .ok_or_else(|| doctor_not_found(id))
    }

    async fn update_doctor(&self, id: RecordId, doctor: DoctorCreate) -> Result<Doctor, AppError> {
        self.doctors
            .write()
            .replace(id, doctor.into_doctor(id))
            .ok_or_else(|| doctor_not_found(id))
    }

    async fn delete_doctor(&self, id: RecordId) -> Result<Doctor, AppError> {
        self.doctors
            .write()
            .remove(id)
            .ok_or_else(|| doctor_not_found(id))
    }
}
