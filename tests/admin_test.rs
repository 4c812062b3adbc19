mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use common::{admin, register, services};
use fitfusion_backend::models::Role;
use serde_json::{json, Value};

#[actix_web::test]
async fn admin_routes_reject_other_roles() {
    let services = services().await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;
    let (client_token, _) = register(&services, "Ann", "ann@example.com", Role::Client).await;
    let (trainer_token, _) = register(&services, "Tom", "tom@example.com", Role::Trainer).await;

    for token in [&client_token, &trainer_token] {
        for uri in ["/api/admin/users", "/api/admin/workouts", "/api/admin/exercises"] {
            let req = test::TestRequest::get()
                .uri(uri)
                .insert_header(("x-auth-token", token.as_str()))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["msg"], "Access denied. Admin only.");
        }
    }
}

#[actix_web::test]
async fn admin_manages_users() {
    let services = services().await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;
    let (token, _) = admin(&services).await;
    let (_, ann) = register(&services, "Ann", "ann@example.com", Role::Client).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/users")
        .insert_header(("x-auth-token", token.as_str()))
        .set_json(json!({ "name": "Coach", "email": "Coach@Example.com", "role": "trainer" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(created["email"], "coach@example.com");
    assert_eq!(created["role"], "trainer");

    // default password applies when none is given
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "coach@example.com", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/users/{}", ann.id))
        .insert_header(("x-auth-token", token.as_str()))
        .set_json(json!({ "email": "coach@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["msg"], "Email already in use");

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/users/{}", ann.id))
        .insert_header(("x-auth-token", token.as_str()))
        .set_json(json!({ "role": "trainer", "name": "Ann T" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["role"], "trainer");
    assert_eq!(updated["name"], "Ann T");
    assert_eq!(updated["email"], "ann@example.com");

    let req = test::TestRequest::get()
        .uri("/api/admin/users")
        .insert_header(("x-auth-token", token.as_str()))
        .to_request();
    let users: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(users.as_array().unwrap().len(), 3);
    assert!(users[0].get("password").is_none());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/users/{}", ann.id))
        .insert_header(("x-auth-token", token.as_str()))
        .to_request();
    let removed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(removed["msg"], "User removed");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/users/{}", ann.id))
        .insert_header(("x-auth-token", token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn admin_manages_any_workout_and_exercise() {
    let services = services().await;
    let app = test::init_service(App::new().configure(|cfg| services.configure(cfg))).await;
    let (token, _) = admin(&services).await;
    let (ann_token, ann) = register(&services, "Ann", "ann@example.com", Role::Client).await;
    let (_, bob) = register(&services, "Bob", "bob@example.com", Role::Client).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/workouts")
        .insert_header(("x-auth-token", token.as_str()))
        .set_json(json!({ "userId": ann.id, "title": "Assigned Session", "duration": 30 }))
        .to_request();
    let workout: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(workout["userId"], ann.id);
    assert_eq!(workout["user"]["email"], "ann@example.com");
    let workout_id = workout["id"].as_i64().unwrap();

    // the owner sees it through the regular routes
    let req = test::TestRequest::get()
        .uri(&format!("/api/workouts/{}", workout_id))
        .insert_header(("x-auth-token", ann_token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/admin/exercises")
        .insert_header(("x-auth-token", token.as_str()))
        .set_json(json!({ "workoutId": workout_id, "name": "Plank", "sets": 3, "reps": 1 }))
        .to_request();
    let exercise: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(exercise["workout"]["title"], "Assigned Session");
    assert_eq!(exercise["weight"], 0.0);

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/workouts/{}", workout_id))
        .insert_header(("x-auth-token", token.as_str()))
        .set_json(json!({ "userId": bob.id, "title": "Reassigned" }))
        .to_request();
    let moved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(moved["userId"], bob.id);
    assert_eq!(moved["title"], "Reassigned");
    assert_eq!(moved["duration"], 30);
    assert_eq!(moved["user"]["name"], "Bob");

    let req = test::TestRequest::get()
        .uri(&format!("/api/workouts/{}", workout_id))
        .insert_header(("x-auth-token", ann_token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/admin/exercises/{}", exercise["id"]))
        .insert_header(("x-auth-token", token.as_str()))
        .set_json(json!({ "reps": 2 }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["reps"], 2);
    assert_eq!(updated["workout"]["userId"], bob.id);

    let req = test::TestRequest::get()
        .uri("/api/admin/exercises")
        .insert_header(("x-auth-token", token.as_str()))
        .to_request();
    let all: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/workouts/{}", workout_id))
        .insert_header(("x-auth-token", token.as_str()))
        .to_request();
    let removed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(removed["msg"], "Workout removed");

    let req = test::TestRequest::get()
        .uri("/api/admin/workouts")
        .insert_header(("x-auth-token", token.as_str()))
        .to_request();
    let all: Value = test::call_and_read_body_json(&app, req).await;
    assert!(all.as_array().unwrap().is_empty());
}
