use serde_json::{json, Value};

use fitness_sharks::admin::TrainerRoster;
use fitness_sharks::config::ClientOptions;
use fitness_sharks::models::Trainer;
use fitness_sharks::storage::{MemoryStore, PhotoStore};
use fitness_sharks::ApiClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PHOTO: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";

fn client_for(server: &MockServer) -> ApiClient {
    let options = ClientOptions::default().with_base_url(&format!("{}/api", server.uri()));
    ApiClient::new(options).unwrap()
}

async fn mount_roster(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/trainers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "name": "Kai", "specialization": "Boxing", "experience": 3,
             "email": "kai@gym.io", "phone": "555-7", "photo": null},
            {"id": 8, "name": "Lena", "specialization": "Yoga", "experience": 6,
             "email": "lena@gym.io", "phone": "555-8", "photo": "https://cdn.gym.io/lena.jpg"}
        ])))
        .mount(server)
        .await;
}

fn kai(photo: Option<&str>) -> Trainer {
    Trainer {
        name: "Kai".to_string(),
        specialization: "Boxing".to_string(),
        experience: 3,
        email: "kai@gym.io".to_string(),
        phone: "555-7".to_string(),
        photo: photo.map(str::to_string),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_save_new_trainer_keeps_photo_local() {
    let server = MockServer::start().await;
    mount_roster(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/trainers"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 7, "name": "Kai", "specialization": "Boxing", "experience": 3,
            "email": "kai@gym.io", "phone": "555-7"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let photos = PhotoStore::new(MemoryStore::new());
    let roster = TrainerRoster::new(&client, &photos);

    let trainers = roster.save(kai(Some(PHOTO)), None).await.unwrap();

    assert_eq!(trainers[0].photo.as_deref(), Some(PHOTO));
    assert_eq!(trainers[1].photo.as_deref(), Some("https://cdn.gym.io/lena.jpg"));
    assert_eq!(photos.get(7).unwrap().as_deref(), Some(PHOTO));

    let requests = server.received_requests().await.unwrap();
    let posted: Value = requests
        .iter()
        .find(|r| !r.body.is_empty())
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .unwrap();
    assert!(posted.get("photo").is_none());
    assert_eq!(posted["name"], "Kai");
}

#[tokio::test]
async fn test_update_stores_photo_under_edited_id() {
    let server = MockServer::start().await;
    mount_roster(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/trainers/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Lena"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let photos = PhotoStore::new(MemoryStore::new());
    let roster = TrainerRoster::new(&client, &photos);

    let trainers = roster.save(kai(Some(PHOTO)), Some(8)).await.unwrap();

    assert_eq!(photos.get(8).unwrap().as_deref(), Some(PHOTO));
    assert_eq!(trainers[1].photo.as_deref(), Some(PHOTO));
    assert_eq!(trainers[0].photo, None);
}

#[tokio::test]
async fn test_save_without_photo_leaves_store_alone() {
    let server = MockServer::start().await;
    mount_roster(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/trainers/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let photos = PhotoStore::new(MemoryStore::new());
    photos.set(7, PHOTO).unwrap();
    let roster = TrainerRoster::new(&client, &photos);

    let trainers = roster.save(kai(Some("")), Some(7)).await.unwrap();

    assert_eq!(photos.get(7).unwrap().as_deref(), Some(PHOTO));
    assert_eq!(trainers[0].photo.as_deref(), Some(PHOTO));
}

#[tokio::test]
async fn test_delete_drops_local_photo() {
    let server = MockServer::start().await;
    mount_roster(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/trainers/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Trainer deleted"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let photos = PhotoStore::new(MemoryStore::new());
    photos.set(7, PHOTO).unwrap();
    let roster = TrainerRoster::new(&client, &photos);

    roster.delete(7).await.unwrap();

    assert_eq!(photos.get(7).unwrap(), None);
}

#[tokio::test]
async fn test_failed_save_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/trainers"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "Email already used"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let photos = PhotoStore::new(MemoryStore::new());
    let roster = TrainerRoster::new(&client, &photos);

    let err = roster.save(kai(Some(PHOTO)), None).await.unwrap_err();

    assert_eq!(err.to_string(), "Email already used");
    assert!(photos.all().unwrap().is_empty());
}
