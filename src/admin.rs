//! Admin flows that span the backend and the device-local store
//!
//! Trainer photos never reach the backend. [`TrainerRoster`] splits the photo
//! off before every create/update, stores it locally under the trainer id,
//! and merges the local photos back onto every list it fetches. Each
//! mutation is followed by a fresh fetch; nothing is cached.

use fitness_sharks_storage::{KeyValueStore, PhotoStore};

use crate::error::Result;
use crate::models::Trainer;
use crate::ApiClient;

pub struct TrainerRoster<'a, S> {
    client: &'a ApiClient,
    photos: &'a PhotoStore<S>,
}

impl<'a, S: KeyValueStore> TrainerRoster<'a, S> {
    pub fn new(client: &'a ApiClient, photos: &'a PhotoStore<S>) -> Self {
        Self { client, photos }
    }

    /// Fetch all trainers with their device-local photos merged in. The
    /// local photo wins over one reported by the backend.
    pub async fn list(&self) -> Result<Vec<Trainer>> {
        let mut trainers = self.client.trainers().list().await?;
        let mut local = self.photos.all()?;
        for trainer in &mut trainers {
            if let Some(photo) = trainer.id.and_then(|id| local.remove(&id)) {
                trainer.photo = Some(photo);
            }
        }
        Ok(trainers)
    }

    /// Create a trainer, or update `editing` when given, then return the
    /// refreshed roster. The photo is stored locally under the resulting id.
    pub async fn save(&self, trainer: Trainer, editing: Option<i64>) -> Result<Vec<Trainer>> {
        let (payload, photo) = split_photo(trainer);

        let trainer_id = match editing {
            Some(id) => {
                self.client.trainers().update(id, &payload).await?;
                Some(id)
            }
            None => self.client.trainers().create(&payload).await?.id,
        };

        match (photo, trainer_id) {
            (Some(photo), Some(id)) => self.photos.set(id, &photo)?,
            (Some(_), None) => log::warn!("backend returned no trainer id; photo not stored"),
            _ => {}
        }

        self.list().await
    }

    /// Delete a trainer and its local photo, then return the refreshed roster
    pub async fn delete(&self, id: i64) -> Result<Vec<Trainer>> {
        self.client.trainers().delete(id).await?;
        self.photos.remove(id)?;
        self.list().await
    }
}

fn split_photo(mut trainer: Trainer) -> (Trainer, Option<String>) {
    let photo = trainer.photo.take().filter(|p| !p.is_empty());
    (trainer, photo)
}
