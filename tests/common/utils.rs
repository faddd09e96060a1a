use chrono::{Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;
use uuid::Uuid;

use pitchside_backend::config::settings::{get_config, get_jwt_settings, DatabaseSettings};
use pitchside_backend::run;
use pitchside_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);
    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    let connection_pool = configure_db(&configuration.database).await;
    let jwt_settings = get_jwt_settings(&configuration);
    let server = run(listener, connection_pool.clone(), jwt_settings).expect("Failed to bind address");
    let _ = tokio::spawn(server);
    TestApp {
        address,
        db_pool: connection_pool,
    }
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    // Create database
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

/// Register a player with the given age and log them in.
/// Returns (token, user_id).
pub async fn register_player(app_address: &str, age: i16) -> (String, Uuid) {
    let client = Client::new();
    let username = format!("player{}", &Uuid::new_v4().to_string()[..13]);
    let password = "password123";

    let register_response = client
        .post(format!("{}/register_user", app_address))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": password,
            "first_name": "Test",
            "last_name": "Player",
            "age": age
        }))
        .send()
        .await
        .expect("Failed to register user.");
    assert_eq!(200, register_response.status().as_u16());
    let body: serde_json::Value = register_response
        .json()
        .await
        .expect("Failed to parse registration response");
    let user_id = Uuid::parse_str(body["data"]["user_id"].as_str().expect("No user id"))
        .expect("Invalid user id");

    let login_response = client
        .post(format!("{}/login", app_address))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to execute login request.");
    assert_eq!(200, login_response.status().as_u16());
    let login_body: serde_json::Value =
        login_response.json().await.expect("Failed to parse login response");
    let token = login_body["token"].as_str().expect("No token in response");

    (token.to_string(), user_id)
}

pub async fn authed_post(
    client: &Client,
    url: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> reqwest::Response {
    let mut request = client.post(url).bearer_auth(token);
    if let Some(body) = body {
        request = request.json(&body);
    }
    request.send().await.expect("Failed to execute request")
}

/// Register a field owned by the token's user.
pub async fn create_field(client: &Client, app_address: &str, token: &str) -> Uuid {
    let response = authed_post(
        client,
        &format!("{}/fields", app_address),
        token,
        Some(json!({ "name": "Test Arena" })),
    )
    .await;
    assert_eq!(201, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    Uuid::parse_str(body["data"]["id"].as_str().expect("No field id")).expect("Invalid field id")
}

/// Open every weekday around the clock so bookings in tests never collide
/// with the weekly template.
pub async fn open_all_week(client: &Client, app_address: &str, token: &str, field_id: Uuid) {
    for day in 0..7 {
        let response = client
            .put(format!(
                "{}/fields/{}/availability/rules",
                app_address, field_id
            ))
            .bearer_auth(token)
            .json(&json!({ "day_of_week": day, "open_hour": 0, "close_hour": 24 }))
            .send()
            .await
            .expect("Failed to set rule");
        assert_eq!(200, response.status().as_u16());
    }
}

/// A date comfortably in the future, so slots never fall in the past.
pub fn future_date(days_ahead: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days_ahead)
}

/// Book a slot; panics unless the booking is created. Returns the booking id.
pub async fn create_booking(
    client: &Client,
    app_address: &str,
    token: &str,
    field_id: Uuid,
    slot_date: NaiveDate,
    hour: i16,
) -> Uuid {
    let response = authed_post(
        client,
        &format!("{}/bookings", app_address),
        token,
        Some(json!({ "field_id": field_id, "slot_date": slot_date, "hour": hour })),
    )
    .await;
    assert_eq!(201, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    Uuid::parse_str(body["data"]["id"].as_str().expect("No booking id")).expect("Invalid id")
}

/// Booking + open match in one go. Returns (booking_id, match_id).
pub async fn create_open_match(
    client: &Client,
    app_address: &str,
    token: &str,
    field_id: Uuid,
    hour: i16,
    min_players: i16,
    max_players: i16,
) -> (Uuid, Uuid) {
    let booking_id =
        create_booking(client, app_address, token, field_id, future_date(7), hour).await;
    let response = authed_post(
        client,
        &format!("{}/matches/open", app_address),
        token,
        Some(json!({
            "booking_id": booking_id,
            "min_players": min_players,
            "max_players": max_players
        })),
    )
    .await;
    assert_eq!(201, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let match_id =
        Uuid::parse_str(body["data"]["id"].as_str().expect("No match id")).expect("Invalid id");
    (booking_id, match_id)
}

pub async fn get_match_details(
    client: &Client,
    app_address: &str,
    token: &str,
    match_id: Uuid,
) -> serde_json::Value {
    let response = client
        .get(format!("{}/matches/{}", app_address, match_id))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to fetch match");
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    body["data"].clone()
}

/// Error payloads carry a stable machine-readable code.
pub async fn error_code(response: reqwest::Response) -> String {
    let body: serde_json::Value = response.json().await.expect("Failed to parse error body");
    body["code"].as_str().expect("No error code").to_string()
}
