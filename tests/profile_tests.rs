// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile setup, energy targets and target weight over HTTP.

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;

use common::{create_test_app, register_and_login, send, setup_body};

#[tokio::test]
async fn test_profile_before_setup_has_no_targets() {
    let (app, _) = create_test_app();
    let (_, token) = register_and_login(&app, "fresh").await;

    let (status, body) = send(&app, Method::GET, "/user/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["setupComplete"], json!(false));
    assert!(body["macros"].is_null());
    assert!(body["tdee"].is_null());
    assert!(body["targetWeight"].is_null());
}

#[tokio::test]
async fn test_setup_computes_targets() {
    let (app, _) = create_test_app();
    let (_, token) = register_and_login(&app, "setter").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/user/setup",
        Some(&token),
        Some(setup_body("male", "sedentary", "maintain", None)),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["bmr"].as_f64(), Some(1780.0));
    let tdee = body["tdee"].as_f64().unwrap();
    assert!((tdee - 1780.0 * 1.2).abs() < 1e-9);

    let (status, profile) = send(&app, Method::GET, "/user/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["setupComplete"], json!(true));
    assert_eq!(profile["goal"], "maintain");
    assert_eq!(profile["tdee"].as_f64(), Some(tdee));
    // 2136 kcal: 267 g carbs, 160 g protein, 47 g fat
    assert_eq!(profile["macros"]["carbs"], json!(267));
    assert_eq!(profile["macros"]["protein"], json!(160));
    assert_eq!(profile["macros"]["fat"], json!(47));
}

#[tokio::test]
async fn test_setup_female_lose_ten_percent() {
    let (app, _) = create_test_app();
    let (_, token) = register_and_login(&app, "loser").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/user/setup",
        Some(&token),
        Some(setup_body("female", "moderately_active", "lose", Some(10.0))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bmr"].as_f64(), Some(1614.0));
    let expected = 1614.0 * 1.55 * 0.9;
    assert!((body["tdee"].as_f64().unwrap() - expected).abs() < 1e-6);

    let (_, profile) = send(&app, Method::GET, "/user/profile", Some(&token), None).await;
    assert_eq!(profile["rate"].as_f64(), Some(10.0));
}

#[tokio::test]
async fn test_setup_requires_rate_unless_maintaining() {
    let (app, _) = create_test_app();
    let (_, token) = register_and_login(&app, "ratey").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/user/setup",
        Some(&token),
        Some(setup_body("male", "very_active", "gain", None)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    // Nothing was stored by the failed attempt
    let (_, profile) = send(&app, Method::GET, "/user/profile", Some(&token), None).await;
    assert_eq!(profile["setupComplete"], json!(false));
}

#[tokio::test]
async fn test_setup_rejects_bad_input() {
    let (app, _) = create_test_app();
    let (_, token) = register_and_login(&app, "sloppy").await;

    let mut missing_activity = setup_body("male", "sedentary", "maintain", None);
    missing_activity
        .as_object_mut()
        .unwrap()
        .remove("activityLevel");

    let mut missing_goal = setup_body("male", "sedentary", "maintain", None);
    missing_goal.as_object_mut().unwrap().remove("goal");

    let mut zero_height = setup_body("male", "sedentary", "maintain", None);
    zero_height["height"] = json!(0);

    for body in [
        missing_activity,
        missing_goal,
        zero_height,
        setup_body("male", "couch_potato", "maintain", None),
        setup_body("other", "sedentary", "maintain", None),
        setup_body("male", "sedentary", "lose", Some(0.0)),
        setup_body("male", "sedentary", "lose", Some(100.0)),
    ] {
        let (status, response) =
            send(&app, Method::PUT, "/user/setup", Some(&token), Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {}", body);
        assert_eq!(response["error"], "validation_error");
    }
}

#[tokio::test]
async fn test_setup_resubmission_overwrites() {
    let (app, _) = create_test_app();
    let (_, token) = register_and_login(&app, "changer").await;

    send(
        &app,
        Method::PUT,
        "/user/setup",
        Some(&token),
        Some(setup_body("male", "sedentary", "maintain", None)),
    )
    .await;
    let (status, second) = send(
        &app,
        Method::PUT,
        "/user/setup",
        Some(&token),
        Some(setup_body("male", "extra_active", "maintain", None)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, profile) = send(&app, Method::GET, "/user/profile", Some(&token), None).await;
    assert_eq!(profile["tdee"], second["tdee"]);
}

#[tokio::test]
async fn test_target_weight() {
    let (app, _) = create_test_app();
    let (_, token) = register_and_login(&app, "aimer").await;

    let (status, body) =
        send(&app, Method::GET, "/user/target-weight", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["targetWeight"].is_null());

    let (status, body) = send(
        &app,
        Method::PUT,
        "/user/target-weight",
        Some(&token),
        Some(json!({ "targetWeight": 72.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["targetWeight"].as_f64(), Some(72.5));

    let (_, body) = send(&app, Method::GET, "/user/target-weight", Some(&token), None).await;
    assert_eq!(body["targetWeight"].as_f64(), Some(72.5));

    let (status, _) = send(
        &app,
        Method::PUT,
        "/user/target-weight",
        Some(&token),
        Some(json!({ "targetWeight": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
