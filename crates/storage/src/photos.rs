//! Trainer photos, keyed by trainer id
//!
//! Photos are device-local only. The backend never sees them, so every list
//! fetched from the backend must be merged with [`PhotoStore::merge`].

use std::collections::BTreeMap;

use crate::{load, modify, KeyValueStore, Result, TRAINER_PHOTOS_KEY};

pub struct PhotoStore<S> {
    store: S,
}

impl<S: KeyValueStore> PhotoStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn all(&self) -> Result<BTreeMap<i64, String>> {
        load(&self.store, TRAINER_PHOTOS_KEY)
    }

    pub fn get(&self, trainer_id: i64) -> Result<Option<String>> {
        Ok(self.all()?.remove(&trainer_id))
    }

    pub fn set(&self, trainer_id: i64, photo: &str) -> Result<()> {
        modify(&self.store, TRAINER_PHOTOS_KEY, |photos: &mut BTreeMap<i64, String>| {
            photos.insert(trainer_id, photo.to_string());
        })?;
        log::debug!("stored photo for trainer {}", trainer_id);
        Ok(())
    }

    /// Returns whether a photo was stored for the trainer
    pub fn remove(&self, trainer_id: i64) -> Result<bool> {
        modify(&self.store, TRAINER_PHOTOS_KEY, |photos: &mut BTreeMap<i64, String>| {
            photos.remove(&trainer_id).is_some()
        })
    }

    /// The local photo wins; the backend value is the fallback.
    pub fn merge(&self, trainer_id: i64, backend_photo: Option<String>) -> Result<Option<String>> {
        Ok(self.get(trainer_id)?.or(backend_photo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn test_set_and_get() {
        let photos = PhotoStore::new(MemoryStore::new());
        photos.set(4, "data:image/png;base64,AAAA").unwrap();

        assert_eq!(photos.get(4).unwrap().as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(photos.get(5).unwrap(), None);
    }

    #[test]
    fn test_merge_prefers_local() {
        let photos = PhotoStore::new(MemoryStore::new());
        photos.set(1, "local.jpg").unwrap();

        assert_eq!(
            photos.merge(1, Some("remote.jpg".to_string())).unwrap().as_deref(),
            Some("local.jpg")
        );
        assert_eq!(
            photos.merge(2, Some("remote.jpg".to_string())).unwrap().as_deref(),
            Some("remote.jpg")
        );
        assert_eq!(photos.merge(3, None).unwrap(), None);
    }

    #[test]
    fn test_concurrent_writers_keep_every_photo() {
        let shared = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..16)
            .map(|thread| {
                let photos = PhotoStore::new(Arc::clone(&shared));
                std::thread::spawn(move || {
                    for n in 0..50 {
                        let id = thread * 100 + n;
                        photos.set(id, &format!("photo-{}.jpg", id)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let photos = PhotoStore::new(shared);
        assert_eq!(photos.all().unwrap().len(), 800);
        assert_eq!(photos.get(1549).unwrap().as_deref(), Some("photo-1549.jpg"));
    }

    #[test]
    fn test_remove() {
        let photos = PhotoStore::new(MemoryStore::new());
        photos.set(1, "a.jpg").unwrap();

        assert!(photos.remove(1).unwrap());
        assert!(!photos.remove(1).unwrap());
        assert!(photos.all().unwrap().is_empty());
    }
}
