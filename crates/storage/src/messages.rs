//! Contact-form messages, newest first

use chrono::Utc;
use validator::Validate;

use crate::types::{is_blank, next_id};
use crate::{
    load, modify, ContactForm, ContactMessage, FieldErrors, KeyValueStore, MessageStatus,
    Priority, Result, StorageError, CONTACT_MESSAGES_KEY,
};

const NO_PHONE: &str = "Not provided";
const MISSING_FIELDS: &str = "Please fill in all required fields.";

pub struct MessageStore<S> {
    store: S,
}

impl<S: KeyValueStore> MessageStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<ContactMessage>> {
        load(&self.store, CONTACT_MESSAGES_KEY)
    }

    /// Validate and store a new message at the front of the list
    pub fn submit(&self, form: ContactForm) -> Result<ContactMessage> {
        if let Err(errors) = form.validate() {
            let errors = FieldErrors::from_validation(&errors, |_, _| MISSING_FIELDS.to_string());
            return Err(StorageError::Validation(errors));
        }

        let priority = if form.subject == "feedback" {
            Priority::High
        } else {
            Priority::Normal
        };
        let phone = form
            .phone
            .filter(|p| !is_blank(p))
            .unwrap_or_else(|| NO_PHONE.to_string());

        let now = Utc::now();
        let message = modify(&self.store, CONTACT_MESSAGES_KEY, |messages: &mut Vec<ContactMessage>| {
            let message = ContactMessage {
                id: next_id(now, messages.iter().map(|m| m.id)),
                name: form.name,
                email: form.email,
                phone,
                subject: form.subject,
                message: form.message,
                timestamp: now,
                status: MessageStatus::Unread,
                priority,
            };
            messages.insert(0, message.clone());
            message
        })?;

        log::info!("stored contact message {} from {}", message.id, message.email);
        Ok(message)
    }

    /// Flip read/unread. Returns the new status, or `None` if no such message.
    pub fn toggle_read(&self, id: i64) -> Result<Option<MessageStatus>> {
        modify(&self.store, CONTACT_MESSAGES_KEY, |messages: &mut Vec<ContactMessage>| {
            let message = messages.iter_mut().find(|m| m.id == id)?;
            message.status = match message.status {
                MessageStatus::Read => MessageStatus::Unread,
                MessageStatus::Unread => MessageStatus::Read,
            };
            Some(message.status)
        })
    }

    pub fn mark_all_read(&self) -> Result<()> {
        modify(&self.store, CONTACT_MESSAGES_KEY, |messages: &mut Vec<ContactMessage>| {
            for message in messages.iter_mut() {
                message.status = MessageStatus::Read;
            }
        })
    }

    /// Returns whether a message was removed
    pub fn delete(&self, id: i64) -> Result<bool> {
        modify(&self.store, CONTACT_MESSAGES_KEY, |messages: &mut Vec<ContactMessage>| {
            let before = messages.len();
            messages.retain(|m| m.id != id);
            messages.len() != before
        })
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(CONTACT_MESSAGES_KEY)
    }

    pub fn unread_count(&self) -> Result<usize> {
        Ok(self
            .list()?
            .iter()
            .filter(|m| m.status == MessageStatus::Unread)
            .count())
    }
}
