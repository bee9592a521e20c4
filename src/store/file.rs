//! JSON file-backed [`SecretStore`] for single-node deployments.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{ClientSecret, PrincipalId},
	store::{SecretStore, StoreError, StoreFuture},
};

/// Persists client secrets to a JSON file after each mutation.
///
/// The file holds a JSON array of secrets. Writes go to a sibling `.tmp` file that replaces the
/// original once synced, so readers never observe a half-written snapshot.
#[derive(Clone, Debug)]
pub struct FileSecretStore {
	path: PathBuf,
	inner: Arc<RwLock<HashMap<PrincipalId, ClientSecret>>>,
}
impl FileSecretStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<HashMap<PrincipalId, ClientSecret>, StoreError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(HashMap::new());
		}

		let mut de = serde_json::Deserializer::from_slice(&bytes);
		let entries: Vec<ClientSecret> =
			serde_path_to_error::deserialize(&mut de).map_err(|e| StoreError::Serialization {
				message: format!(
					"Failed to parse {} at `{}`: {}",
					path.display(),
					e.path(),
					e.inner()
				),
			})?;

		Ok(entries.into_iter().map(|secret| (secret.principal.clone(), secret)).collect())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(
		&self,
		contents: &HashMap<PrincipalId, ClientSecret>,
	) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let mut snapshot: Vec<_> = contents.values().collect();

		snapshot.sort_by(|a, b| a.principal.cmp(&b.principal));

		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize secret snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl SecretStore for FileSecretStore {
	fn find_by_principal<'a>(
		&'a self,
		principal: &'a PrincipalId,
	) -> StoreFuture<'a, Option<ClientSecret>> {
		Box::pin(async move { Ok(self.inner.read().get(principal).cloned()) })
	}

	fn save(&self, secret: ClientSecret) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			let mut guard = self.inner.write();

			guard.insert(secret.principal.clone(), secret);
			self.persist_locked(&guard)?;

			Ok(())
		})
	}

	fn remove<'a>(&'a self, principal: &'a PrincipalId) -> StoreFuture<'a, Option<ClientSecret>> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let removed = guard.remove(principal);

			if removed.is_some() {
				self.persist_locked(&guard)?;
			}

			Ok(removed)
		})
	}
}
