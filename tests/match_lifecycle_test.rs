use reqwest::Client;
use serde_json::json;

mod common;
use common::utils::{
    authed_post, create_booking, create_field, create_open_match, error_code, future_date,
    get_match_details, open_all_week, register_player, spawn_app,
};

#[tokio::test]
async fn open_match_starts_open_with_the_organizer_on_the_roster() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, organizer_id) = register_player(&app.address, 30).await;
    let field_id = create_field(&client, &app.address, &token).await;
    open_all_week(&client, &app.address, &token, field_id).await;

    let (booking_id, match_id) =
        create_open_match(&client, &app.address, &token, field_id, 10, 4, 10).await;

    let details = get_match_details(&client, &app.address, &token, match_id).await;
    assert_eq!(details["status"], "OPEN");
    assert_eq!(details["kind"], "open");
    assert_eq!(details["organizer_id"].as_str().unwrap(), organizer_id.to_string());
    assert_eq!(details["booking"]["id"].as_str().unwrap(), booking_id.to_string());
    let players = details["players"].as_array().unwrap();
    assert_eq!(players.len(), 1);
    assert_eq!(players[0]["user_id"].as_str().unwrap(), organizer_id.to_string());
    assert!(details["teams"].is_null());
}

#[tokio::test]
async fn a_booking_backs_at_most_one_match() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, _) = register_player(&app.address, 30).await;
    let field_id = create_field(&client, &app.address, &token).await;
    open_all_week(&client, &app.address, &token, field_id).await;

    let (booking_id, _) =
        create_open_match(&client, &app.address, &token, field_id, 10, 4, 10).await;

    let response = authed_post(
        &client,
        &format!("{}/matches/open", app.address),
        &token,
        Some(json!({ "booking_id": booking_id, "min_players": 4, "max_players": 10 })),
    )
    .await;
    assert_eq!(400, response.status().as_u16());
    assert_eq!("validation", error_code(response).await);
}

#[tokio::test]
async fn only_the_booking_owner_can_organize_a_match_on_it() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, _) = register_player(&app.address, 30).await;
    let (stranger_token, _) = register_player(&app.address, 25).await;
    let field_id = create_field(&client, &app.address, &token).await;
    open_all_week(&client, &app.address, &token, field_id).await;

    let booking_id =
        create_booking(&client, &app.address, &token, field_id, future_date(7), 10).await;

    let response = authed_post(
        &client,
        &format!("{}/matches/open", app.address),
        &stranger_token,
        Some(json!({ "booking_id": booking_id, "min_players": 4, "max_players": 10 })),
    )
    .await;
    assert_eq!(403, response.status().as_u16());
}

#[tokio::test]
async fn closed_match_is_born_with_teams_assigned() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, organizer_id) = register_player(&app.address, 30).await;
    let field_id = create_field(&client, &app.address, &token).await;
    open_all_week(&client, &app.address, &token, field_id).await;

    let mut team_one = vec![organizer_id];
    let mut team_two = Vec::new();
    for i in 0..9 {
        let (_, id) = register_player(&app.address, 20 + i).await;
        if team_one.len() < 5 {
            team_one.push(id);
        } else {
            team_two.push(id);
        }
    }

    let booking_id =
        create_booking(&client, &app.address, &token, field_id, future_date(7), 10).await;
    let response = authed_post(
        &client,
        &format!("{}/matches/closed", app.address),
        &token,
        Some(json!({ "booking_id": booking_id, "team_one": team_one, "team_two": team_two })),
    )
    .await;
    assert_eq!(201, response.status().as_u16());
    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    let match_id = body["data"]["id"].as_str().unwrap().to_string();

    let details = get_match_details(
        &client,
        &app.address,
        &token,
        match_id.parse().unwrap(),
    )
    .await;
    assert_eq!(details["status"], "TEAMS_ASSIGNED");
    assert_eq!(details["kind"], "closed");
    assert_eq!(details["teams"]["team_one"].as_array().unwrap().len(), 5);
    assert_eq!(details["teams"]["team_two"].as_array().unwrap().len(), 5);

    // No roster phase: a stranger cannot join.
    let (stranger_token, _) = register_player(&app.address, 22).await;
    let response = authed_post(
        &client,
        &format!("{}/matches/{}/join", app.address, match_id),
        &stranger_token,
        None,
    )
    .await;
    assert_eq!(409, response.status().as_u16());
    assert_eq!("match_closed", error_code(response).await);
}

#[tokio::test]
async fn closed_match_rejects_uneven_team_sheets() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, organizer_id) = register_player(&app.address, 30).await;
    let (_, other_id) = register_player(&app.address, 25).await;
    let (_, third_id) = register_player(&app.address, 27).await;
    let field_id = create_field(&client, &app.address, &token).await;
    open_all_week(&client, &app.address, &token, field_id).await;

    let booking_id =
        create_booking(&client, &app.address, &token, field_id, future_date(7), 10).await;
    let response = authed_post(
        &client,
        &format!("{}/matches/closed", app.address),
        &token,
        Some(json!({
            "booking_id": booking_id,
            "team_one": [organizer_id, other_id],
            "team_two": [third_id]
        })),
    )
    .await;
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn organizer_cancellation_closes_the_match_for_good() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, _) = register_player(&app.address, 30).await;
    let (joiner_token, _) = register_player(&app.address, 25).await;
    let field_id = create_field(&client, &app.address, &token).await;
    open_all_week(&client, &app.address, &token, field_id).await;

    let (_, match_id) =
        create_open_match(&client, &app.address, &token, field_id, 10, 4, 10).await;

    let response = client
        .delete(format!("{}/matches/{}", app.address, match_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to cancel match");
    assert_eq!(200, response.status().as_u16());

    let details = get_match_details(&client, &app.address, &token, match_id).await;
    assert_eq!(details["status"], "CANCELLED");
    assert_eq!(details["booking"]["active"], false);

    // Cancelled matches accept no further roster mutation.
    let response = authed_post(
        &client,
        &format!("{}/matches/{}/join", app.address, match_id),
        &joiner_token,
        None,
    )
    .await;
    assert_eq!(409, response.status().as_u16());
    assert_eq!("match_closed", error_code(response).await);
}

#[tokio::test]
async fn only_the_organizer_can_cancel_a_match() {
    let app = spawn_app().await;
    let client = Client::new();
    let (token, _) = register_player(&app.address, 30).await;
    let (stranger_token, _) = register_player(&app.address, 25).await;
    let field_id = create_field(&client, &app.address, &token).await;
    open_all_week(&client, &app.address, &token, field_id).await;

    let (_, match_id) =
        create_open_match(&client, &app.address, &token, field_id, 10, 4, 10).await;

    let response = client
        .delete(format!("{}/matches/{}", app.address, match_id))
        .bearer_auth(&stranger_token)
        .send()
        .await
        .expect("Failed to send cancel");
    assert_eq!(403, response.status().as_u16());
}
