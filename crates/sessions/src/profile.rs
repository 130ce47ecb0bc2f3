//! Reads and writes the per-identifier profile blob.

use std::sync::Arc;

use af_blobstore::BlobStore;
use af_domain::error::{Error, Result};
use af_domain::profile::Profile;
use af_domain::trace::TraceEvent;

use crate::keys::KeyLayout;

#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<dyn BlobStore>,
    keys: KeyLayout,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn BlobStore>, keys: KeyLayout) -> Self {
        Self { store, keys }
    }

    /// Load the profile. A missing blob is an empty profile; a blob that
    /// is not a JSON object is an error.
    pub async fn read(&self, id: &str) -> Result<Profile> {
        let key = self.keys.profile_key(id);
        let (profile, found) = match self.store.get(&key).await? {
            Some(raw) => {
                let profile = Profile::from_slice(&raw).map_err(|e| Error::Store {
                    key: key.clone(),
                    message: format!("malformed profile: {e}"),
                })?;
                (profile, true)
            }
            None => (Profile::new(), false),
        };

        TraceEvent::ProfileLoaded {
            id: id.to_owned(),
            found,
            fields: profile.len(),
        }
        .emit();
        Ok(profile)
    }

    /// Replace the stored profile.
    pub async fn write(&self, id: &str, profile: &Profile) -> Result<()> {
        self.store
            .put(&self.keys.profile_key(id), profile.to_vec()?)
            .await
    }

    /// Read-modify-write. `apply` returns the names of the fields it
    /// changed. The blob is always written back, so the first update for
    /// an identifier creates it.
    pub async fn update<F>(&self, id: &str, apply: F) -> Result<Profile>
    where
        F: FnOnce(&mut Profile) -> Vec<String>,
    {
        let mut profile = self.read(id).await?;
        let changed = apply(&mut profile);
        self.write(id, &profile).await?;
        TraceEvent::ProfileUpdated {
            id: id.to_owned(),
            changed,
        }
        .emit();
        Ok(profile)
    }
}
