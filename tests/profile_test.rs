mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use common::{register, services};
use fitfusion_backend::models::Role;
use serde_json::{json, Value};

// 1x1 transparent PNG
const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae,
    0x42, 0x60, 0x82,
];

#[actix_web::test]
async fn profile_update_keeps_credentials_out() {
    let services = services().await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;
    let (token, _) = register(&services, "Ann", "ann@example.com", Role::Client).await;

    let req = test::TestRequest::put()
        .uri("/api/profile/me")
        .insert_header(("x-auth-token", token.as_str()))
        .set_json(json!({
            "bio": "Runner",
            "height": 170.5,
            "fitnessGoals": ["endurance"],
            "activityLevel": "very_active",
            "email": "hijack@example.com",
            "role": "admin"
        }))
        .to_request();
    let profile: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile["bio"], "Runner");
    assert_eq!(profile["height"], 170.5);
    assert_eq!(profile["fitnessGoals"][0], "endurance");
    assert_eq!(profile["activityLevel"], "very_active");
    assert_eq!(profile["email"], "ann@example.com");
    assert_eq!(profile["role"], "client");

    let req = test::TestRequest::get()
        .uri("/api/profile/me")
        .insert_header(("x-auth-token", token.as_str()))
        .to_request();
    let profile: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile["bio"], "Runner");
    assert_eq!(profile["bodyType"], "mesomorph");
}

#[actix_web::test]
async fn trainer_directory_respects_privacy() {
    let services = services().await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;
    let (client_token, _) = register(&services, "Ann", "ann@example.com", Role::Client).await;
    let (junior_token, junior) = register(&services, "Jay", "jay@example.com", Role::Trainer).await;
    let (senior_token, senior) = register(&services, "Sam", "sam@example.com", Role::Trainer).await;

    for (token, years, public) in [(&junior_token, 2, true), (&senior_token, 10, false)] {
        let req = test::TestRequest::put()
            .uri("/api/profile/me")
            .insert_header(("x-auth-token", token.as_str()))
            .set_json(json!({ "trainerInfo": { "experience": years }, "isProfilePublic": public }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/api/profile/trainers")
        .insert_header(("x-auth-token", client_token.as_str()))
        .to_request();
    let trainers: Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<i64> = trainers
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![junior.id]);

    let req = test::TestRequest::get()
        .uri(&format!("/api/profile/trainers/{}", senior.id))
        .insert_header(("x-auth-token", client_token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["msg"], "Profile is private");

    let req = test::TestRequest::get()
        .uri(&format!("/api/profile/trainers/{}", senior.id))
        .insert_header(("x-auth-token", senior_token.as_str()))
        .to_request();
    let own: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(own["trainerInfo"]["experience"], 10);

    let req = test::TestRequest::get()
        .uri("/api/profile/trainers/9999")
        .insert_header(("x-auth-token", client_token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn picture_upload_is_served_back() {
    let services = services().await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;
    let (token, _) = register(&services, "Ann", "ann@example.com", Role::Client).await;

    let req = test::TestRequest::post()
        .uri("/api/profile/me/picture")
        .insert_header(("x-auth-token", token.as_str()))
        .insert_header(("content-type", "image/png"))
        .set_payload(PIXEL_PNG)
        .to_request();
    let uploaded: Value = test::call_and_read_body_json(&app, req).await;
    let path = uploaded["profilePicture"].as_str().unwrap().to_string();
    assert!(path.starts_with("/uploads/profile-"));
    assert!(path.ends_with(".png"));

    let req = test::TestRequest::get().uri(&path).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/png");
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], PIXEL_PNG);

    let req = test::TestRequest::post()
        .uri("/api/profile/me/picture")
        .insert_header(("x-auth-token", token.as_str()))
        .insert_header(("content-type", "application/pdf"))
        .set_payload("%PDF-1.4")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/uploads/missing.png").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
