//! CRUD handles for the backend collections

use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

use crate::error::Result;
use crate::fetch::Transport;
use crate::models::{Subscription, User};

/// List/get/create/update/delete over one collection path such as
/// `/trainers`
pub struct Resource<'a, T> {
    transport: &'a Transport,
    path: &'static str,
    _record: PhantomData<T>,
}

impl<'a, T> Resource<'a, T>
where
    T: Serialize + DeserializeOwned,
{
    pub(crate) fn new(transport: &'a Transport, path: &'static str) -> Self {
        Self {
            transport,
            path,
            _record: PhantomData,
        }
    }

    fn item_path(&self, id: i64) -> String {
        format!("{}/{}", self.path, id)
    }

    pub async fn list(&self) -> Result<Vec<T>> {
        self.transport.get(self.path).execute().await
    }

    pub async fn get(&self, id: i64) -> Result<T> {
        self.transport.get(&self.item_path(id)).execute().await
    }

    pub async fn create(&self, record: &T) -> Result<T> {
        let created = self.transport.post(self.path).json(record)?.execute().await?;
        log::info!("created record in {}", self.path);
        Ok(created)
    }

    pub async fn update(&self, id: i64, record: &T) -> Result<T> {
        let updated = self
            .transport
            .put(&self.item_path(id))
            .json(record)?
            .execute()
            .await?;
        log::info!("updated {}/{}", self.path, id);
        Ok(updated)
    }

    /// Delete a record. Whatever the backend puts in the body is ignored.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.transport.delete(&self.item_path(id)).execute_empty().await?;
        log::info!("deleted {}/{}", self.path, id);
        Ok(())
    }
}

/// Membership subscriptions
pub struct Subscriptions<'a> {
    transport: &'a Transport,
}

impl<'a> Subscriptions<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    /// All subscriptions (admin)
    pub async fn list(&self) -> Result<Vec<Subscription>> {
        self.transport.get("/subscriptions").execute().await
    }

    pub async fn for_user(&self, user_id: i64) -> Result<Vec<Subscription>> {
        self.transport
            .get(&format!("/subscriptions/user/{}", user_id))
            .execute()
            .await
    }

    /// Subscribe a user to a membership plan and, optionally, a training plan
    pub async fn subscribe(
        &self,
        user_id: i64,
        membership_id: i64,
        plan_id: Option<i64>,
    ) -> Result<Subscription> {
        let mut request = self
            .transport
            .post("/subscriptions/subscribe")
            .query("userId", user_id)
            .query("membershipId", membership_id);
        if let Some(plan_id) = plan_id {
            request = request.query("planId", plan_id);
        }

        let subscription: Subscription = request.execute().await?;
        log::info!(
            "subscribed user {} to membership {} as subscription {}",
            user_id,
            membership_id,
            subscription.id
        );
        Ok(subscription)
    }
}

/// Account administration
pub struct Users<'a> {
    transport: &'a Transport,
}

impl<'a> Users<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.transport.get("/users").execute().await
    }

    pub async fn delete(&self, user_id: i64) -> Result<()> {
        self.transport
            .delete(&format!("/users/{}", user_id))
            .execute_empty()
            .await?;
        log::info!("deleted user {}", user_id);
        Ok(())
    }
}
