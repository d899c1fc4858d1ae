//! Mock recipe backend for testing
//!
//! Serves the same routes as the real backend so the HTTP client can be
//! exercised end to end:
//! - GET /recipes, GET /recipes/{id}
//! - GET /recommendations?user_id=ID returns { recommendations: [...] }
//! - GET /profiles?user_id=ID, POST /profiles, PUT /profiles/{id}
//! - POST /interactions, GET /interactions?user_id=ID&type=like
//! - POST /auth/google returns { user: {...} }

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::json;

use crate::domain::{Profile, Recipe, User};

/// Mock backend server for testing
pub struct MockBackendServer {
    port: u16,
    running: Arc<AtomicBool>,
    state: Arc<Mutex<MockState>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

/// Configuration for mock responses
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Catalog served by /recipes and /recommendations
    pub recipes: Vec<Recipe>,
    /// Profiles served by GET /profiles
    pub profiles: Vec<Profile>,
    /// Interaction records already stored, as raw JSON
    pub interactions: Vec<serde_json::Value>,
    /// User returned by /auth/google
    pub auth_user: Option<User>,
    /// Answer every request with this status
    pub fail_status: Option<u16>,
    /// Answer /profiles requests with a 500
    pub fail_profiles: bool,
    /// Answer GET /recipes/{id} with a 500 for these ids
    pub fail_recipe_ids: Vec<String>,
    /// Send a 200 with a body that is not JSON
    pub malformed_json: bool,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
}

#[derive(Debug, Default)]
struct MockState {
    profiles: Vec<Profile>,
    interactions: Vec<serde_json::Value>,
    requests: Vec<String>,
    next_id: u64,
}

impl MockBackendServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let state = Arc::new(Mutex::new(MockState {
            profiles: config.profiles.clone(),
            interactions: config.interactions.clone(),
            next_id: 100,
            ..Default::default()
        }));
        let state_clone = state.clone();

        listener.set_nonblocking(true)?;

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        let state = state_clone.clone();
                        thread::spawn(move || {
                            handle_connection(stream, &cfg, &state);
                        });
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            state,
            thread_handle: Some(thread_handle),
        })
    }

    /// Get the base URL for this mock server
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Interaction records stored so far, as raw JSON
    pub fn interactions(&self) -> Vec<serde_json::Value> {
        self.state.lock().unwrap().interactions.clone()
    }

    /// Request lines received so far, e.g. "GET /recipes"
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockBackendServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Read the request head and a Content-Length body
fn read_request(stream: &mut TcpStream) -> Option<(String, String)> {
    stream.set_nonblocking(false).ok()?;
    let mut data = Vec::new();
    let mut buffer = [0; 4096];
    let head_end = loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buffer[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&data[..head_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while data.len() < head_end + content_length {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);
    }
    let body = String::from_utf8_lossy(&data[head_end..]).to_string();
    Some((head, body))
}

/// Compare a stored id (number or string) with a query value
fn id_matches(stored: &serde_json::Value, wanted: &str) -> bool {
    match stored {
        serde_json::Value::String(s) => s == wanted,
        serde_json::Value::Number(n) => n.to_string() == wanted,
        _ => false,
    }
}

fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

fn handle_connection(mut stream: TcpStream, config: &MockConfig, state: &Mutex<MockState>) {
    let Some((head, body)) = read_request(&mut stream) else {
        return;
    };

    if config.delay_ms > 0 {
        thread::sleep(std::time::Duration::from_millis(config.delay_ms));
    }

    let first_line = head.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        send_response(&mut stream, 400, r#"{"error": "Invalid request"}"#);
        return;
    }
    let method = parts[0];
    let (path, query) = parts[1].split_once('?').unwrap_or((parts[1], ""));
    state
        .lock()
        .unwrap()
        .requests
        .push(format!("{} {}", method, path));

    if let Some(status) = config.fail_status {
        send_response(&mut stream, status, r#"{"error": "Backend unavailable"}"#);
        return;
    }
    if config.malformed_json {
        send_response(&mut stream, 200, "<html>not json</html>");
        return;
    }
    if config.fail_profiles && path.starts_with("/profiles") {
        send_response(&mut stream, 500, r#"{"error": "Profile store down"}"#);
        return;
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (method, segments.as_slice()) {
        ("GET", ["recipes"]) => {
            let json = serde_json::to_string(&config.recipes).unwrap();
            send_response(&mut stream, 200, &json);
        }
        ("GET", ["recipes", id]) => {
            if config.fail_recipe_ids.iter().any(|f| f == id) {
                send_response(&mut stream, 500, r#"{"error": "Recipe lookup failed"}"#);
                return;
            }
            match config.recipes.iter().find(|r| r.id == *id) {
                Some(recipe) => {
                    let json = serde_json::to_string(recipe).unwrap();
                    send_response(&mut stream, 200, &json);
                }
                None => send_response(&mut stream, 404, r#"{"error": "Recipe not found"}"#),
            }
        }
        ("GET", ["recommendations"]) => {
            let json = json!({ "recommendations": config.recipes }).to_string();
            send_response(&mut stream, 200, &json);
        }
        ("GET", ["profiles"]) => {
            let user_id = query_param(query, "user_id").unwrap_or("");
            let state = state.lock().unwrap();
            let found: Vec<&Profile> = state
                .profiles
                .iter()
                .filter(|p| p.user_id.as_deref() == Some(user_id))
                .collect();
            let json = serde_json::to_string(&found).unwrap();
            send_response(&mut stream, 200, &json);
        }
        ("POST", ["profiles"]) => {
            let Ok(mut profile) = serde_json::from_str::<Profile>(&body) else {
                send_response(&mut stream, 400, r#"{"error": "Invalid profile"}"#);
                return;
            };
            let mut state = state.lock().unwrap();
            state.next_id += 1;
            profile.id = Some(state.next_id.to_string());
            state.profiles.push(profile.clone());
            // Wrapped response shape
            let json = json!({ "user_id": profile.user_id, "profile": profile }).to_string();
            send_response(&mut stream, 201, &json);
        }
        ("PUT", ["profiles", id]) => {
            let Ok(mut profile) = serde_json::from_str::<Profile>(&body) else {
                send_response(&mut stream, 400, r#"{"error": "Invalid profile"}"#);
                return;
            };
            profile.id = Some(id.to_string());
            let mut state = state.lock().unwrap();
            match state.profiles.iter_mut().find(|p| p.id.as_deref() == Some(*id)) {
                Some(slot) => {
                    *slot = profile.clone();
                    let json = serde_json::to_string(&profile).unwrap();
                    send_response(&mut stream, 200, &json);
                }
                None => send_response(&mut stream, 404, r#"{"error": "Profile not found"}"#),
            }
        }
        ("POST", ["interactions"]) => {
            // Stored as sent, the way a schemaless backend keeps it
            let Ok(serde_json::Value::Object(mut record)) = serde_json::from_str(&body) else {
                send_response(&mut stream, 400, r#"{"error": "Invalid interaction"}"#);
                return;
            };
            let mut state = state.lock().unwrap();
            state.next_id += 1;
            record.insert("id".to_string(), json!(state.next_id));
            let record = serde_json::Value::Object(record);
            state.interactions.push(record.clone());
            send_response(&mut stream, 201, &record.to_string());
        }
        ("GET", ["interactions"]) => {
            let user_id = query_param(query, "user_id").unwrap_or("");
            let kind = query_param(query, "type");
            let state = state.lock().unwrap();
            let found: Vec<&serde_json::Value> = state
                .interactions
                .iter()
                .filter(|i| id_matches(&i["user_id"], user_id))
                .filter(|i| kind.map_or(true, |k| i["type"].as_str() == Some(k)))
                .collect();
            let json = serde_json::to_string(&found).unwrap();
            send_response(&mut stream, 200, &json);
        }
        ("POST", ["auth", "google"]) => {
            let json = json!({ "user": config.auth_user }).to_string();
            send_response(&mut stream, 200, &json);
        }
        _ => send_response(&mut stream, 404, r#"{"error": "Endpoint not found"}"#),
    }
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

fn send_response(stream: &mut TcpStream, status: u16, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text(status),
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::{GoogleIdentityClient, HttpApiClient};
    use crate::domain::result::Error;
    use crate::domain::{Allergen, DietType, Interaction, InteractionKind};
    use crate::ports::{IdentityProvider, RecipeApi};

    fn catalog() -> Vec<Recipe> {
        vec![
            Recipe::new("1", "Miso Soup")
                .with_sodium(800.0)
                .with_allergen(Allergen::Soy, true),
            Recipe::new("2", "Peanut Noodles")
                .with_sodium(100.0)
                .with_allergen(Allergen::Peanuts, true),
        ]
    }

    fn start(config: MockConfig) -> (MockBackendServer, HttpApiClient) {
        let server = MockBackendServer::start(config).unwrap();
        let client = HttpApiClient::new(&server.base_url()).unwrap();
        (server, client)
    }

    #[tokio::test]
    async fn test_list_and_get_recipes() {
        let (_server, client) = start(MockConfig {
            recipes: catalog(),
            ..Default::default()
        });

        let recipes = client.list_recipes().await.unwrap();
        assert_eq!(recipes.len(), 2);
        assert!(recipes[1].contains(Allergen::Peanuts));

        let recipe = client.get_recipe("1").await.unwrap();
        assert_eq!(recipe.title, "Miso Soup");
        assert_eq!(recipe.nutrition.sodium_mg, Some(800.0));
    }

    #[tokio::test]
    async fn test_missing_recipe_is_not_found() {
        let (_server, client) = start(MockConfig::default());
        let result = client.get_recipe("404").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_recommendations_unwrapped() {
        let (server, client) = start(MockConfig {
            recipes: catalog(),
            ..Default::default()
        });
        let recipes = client.get_recommendations("1").await.unwrap();
        assert_eq!(recipes.len(), 2);
        assert!(server.requests().contains(&"GET /recommendations".to_string()));
    }

    #[tokio::test]
    async fn test_server_error_carries_status_and_body() {
        let (_server, client) = start(MockConfig {
            fail_status: Some(500),
            ..Default::default()
        });
        match client.list_recipes().await {
            Err(Error::Http { status, body }) => {
                assert_eq!(status, 500);
                assert!(body.contains("Backend unavailable"));
            }
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_json_error() {
        let (_server, client) = start(MockConfig {
            malformed_json: true,
            ..Default::default()
        });
        let result = client.list_recipes().await;
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = HttpApiClient::new("http://127.0.0.1:1").unwrap();
        let result = client.list_recipes().await;
        assert!(result.unwrap_err().is_network());
    }

    #[tokio::test]
    async fn test_profile_create_update_find() {
        let (server, client) = start(MockConfig::default());

        let mut profile = Profile::new("7");
        profile.age = Some(41);
        profile.diet = Some(DietType::Vegan);
        profile.allergies = vec!["peanuts".to_string()];

        let created = client.create_profile(&profile).await.unwrap();
        let id = created.id.clone().unwrap();
        assert_eq!(created.user_id.as_deref(), Some("7"));
        assert_eq!(created.diet, Some(DietType::Vegan));

        let mut edited = created.clone();
        edited.age = Some(42);
        let updated = client.update_profile(&id, &edited).await.unwrap();
        assert_eq!(updated.age, Some(42));
        assert!(server.requests().contains(&format!("PUT /profiles/{}", id)));

        let found = client.find_profiles("7").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].allergies, vec!["peanuts"]);
        assert!(client.find_profiles("8").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_interactions_roundtrip() {
        let (server, client) = start(MockConfig::default());

        let like = Interaction::new("1", "42", InteractionKind::Like);
        let recorded = client.log_interaction(&like).await.unwrap();
        assert!(recorded.id.is_some());
        client
            .log_interaction(&Interaction::new("1", "43", InteractionKind::Save))
            .await
            .unwrap();

        let stored = server.interactions();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0]["type"], json!("like"));
        assert_eq!(stored[0]["event_type"], json!("like"));

        let likes = client
            .list_interactions("1", Some(InteractionKind::Like))
            .await
            .unwrap();
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].recipe_id, "42");
    }

    #[tokio::test]
    async fn test_google_sign_in() {
        let server = MockBackendServer::start(MockConfig {
            auth_user: Some(User::new("55", "Ada Lovelace", "ada@example.com")),
            ..Default::default()
        })
        .unwrap();
        let identity = GoogleIdentityClient::new(&server.base_url()).unwrap();

        let user = identity.verify_google_token("token").await.unwrap().unwrap();
        assert_eq!(user.id, "55");
        assert_eq!(user.first_name(), Some("Ada"));
    }

    #[tokio::test]
    async fn test_google_sign_in_without_user() {
        let server = MockBackendServer::start(MockConfig::default()).unwrap();
        let identity = GoogleIdentityClient::new(&server.base_url()).unwrap();
        assert!(identity.verify_google_token("token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_interactions_written_by_other_clients() {
        let (_server, client) = start(MockConfig {
            interactions: vec![
                json!({"id": 1, "user_id": 1, "recipe_id": 2, "type": "like", "timestamp": "2024-05-01T10:00:00Z"}),
                json!({"id": 2, "user_id": 1, "recipe_id": 3, "type": "view"}),
                json!({"id": 3, "user_id": 1, "recipe_id": 4, "type": "save"}),
                json!({"id": 4, "user_id": 2, "recipe_id": 5, "type": "like"}),
            ],
            ..Default::default()
        });

        let likes = client
            .list_interactions("1", Some(InteractionKind::Like))
            .await
            .unwrap();
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].recipe_id, "2");

        // An unfiltered listing skips the event type this client doesn't know
        let all = client.list_interactions("1", None).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|i| i.recipe_id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4"]);
    }
}
