use std::sync::Arc;

use fitness_sharks_storage::{
    ApplicationStore, ContactForm, FileStore, KeyValueStore, MessageStatus, MessageStore,
    PhotoStore, Priority, CONTACT_MESSAGES_KEY, TRAINER_PHOTOS_KEY,
};

#[test]
fn test_reads_browser_exported_messages() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    // Bare array, exactly as the browser app wrote it
    store
        .set(
            CONTACT_MESSAGES_KEY,
            r#"[
                {"id":1700000000002,"name":"Ana","email":"ana@example.com","phone":"Not provided",
                 "subject":"feedback","message":"Great classes","timestamp":"2023-11-14T22:13:20.002Z",
                 "status":"unread","priority":"high"},
                {"id":1700000000001,"name":"Ben","email":"ben@example.com","phone":"555",
                 "subject":"billing","message":"Invoice?","timestamp":"2023-11-14T22:13:20.001Z",
                 "status":"read","priority":"normal"}
            ]"#,
        )
        .unwrap();

    let messages = MessageStore::new(&store);
    let list = messages.list().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].priority, Priority::High);
    assert_eq!(messages.unread_count().unwrap(), 1);

    // The first write upgrades the value to the envelope format
    messages.mark_all_read().unwrap();
    let raw = store.get(CONTACT_MESSAGES_KEY).unwrap().unwrap();
    assert!(raw.starts_with(r#"{"version":1,"data":["#));
    assert_eq!(messages.unread_count().unwrap(), 0);
}

#[test]
fn test_message_lifecycle_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let messages = MessageStore::new(&store);

    let message = messages
        .submit(ContactForm {
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            phone: Some("555-0199".to_string()),
            subject: "classes".to_string(),
            message: "When is spin?".to_string(),
        })
        .unwrap();

    assert_eq!(messages.toggle_read(message.id).unwrap(), Some(MessageStatus::Read));
    assert_eq!(messages.toggle_read(message.id).unwrap(), Some(MessageStatus::Unread));
    assert_eq!(messages.toggle_read(42).unwrap(), None);

    // A fresh handle over the same directory sees the same data
    let reopened = MessageStore::new(FileStore::open(dir.path()).unwrap());
    assert_eq!(reopened.list().unwrap()[0].phone, "555-0199");

    assert!(reopened.delete(message.id).unwrap());
    assert!(!reopened.delete(message.id).unwrap());

    messages.clear().unwrap();
    assert!(messages.list().unwrap().is_empty());
}

#[test]
fn test_stores_share_one_backend() {
    let dir = tempfile::tempdir().unwrap();
    let shared = Arc::new(FileStore::open(dir.path()).unwrap());

    let photos = PhotoStore::new(Arc::clone(&shared));
    let applications = ApplicationStore::new(Arc::clone(&shared));

    photos.set(12, "https://cdn.example.com/t12.jpg").unwrap();
    assert_eq!(applications.pending_count().unwrap(), 0);

    assert!(shared.get(TRAINER_PHOTOS_KEY).unwrap().is_some());
    assert!(dir.path().join("trainerPhotos.json").exists());
}

#[test]
fn test_file_store_serializes_photo_writers() {
    let dir = tempfile::tempdir().unwrap();
    let shared = FileStore::open(dir.path()).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|thread| {
            let photos = PhotoStore::new(shared.clone());
            std::thread::spawn(move || {
                for n in 0..10 {
                    let id = thread * 10 + n;
                    photos.set(id, &format!("https://cdn.example.com/{}.jpg", id)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let photos = PhotoStore::new(FileStore::open(dir.path()).unwrap());
    assert_eq!(photos.all().unwrap().len(), 80);
}
