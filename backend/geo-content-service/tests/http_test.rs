mod common;

use actix_web::{http::StatusCode, test, App};
use common::{content_body, coordinate_body, fixture};
use geo_content_service::handlers;
use geo_content_service::middleware::USER_ID_HEADER;
use serde_json::Value;

#[actix_web::test]
async fn test_create_get_like_and_delete() {
    let fx = fixture();
    let app = test::init_service(App::new().configure(handlers::configure(fx.dyn_store()))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/create/post")
        .insert_header((USER_ID_HEADER, fx.user.to_string()))
        .set_payload(content_body("community", 35.68, 139.76, "over http"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["username"], "hana");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/post/{}", id))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["content"], "over http");

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/post/{}/like", id))
        .insert_header((USER_ID_HEADER, fx.user.to_string()))
        .to_request();
    let toggled: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(toggled["liked"], true);
    assert_eq!(toggled["like_count"], 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/post/{}/like/status", id))
        .insert_header((USER_ID_HEADER, fx.user.to_string()))
        .to_request();
    let status: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["liked"], true);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/delete/post/{}", id))
        .insert_header((USER_ID_HEADER, fx.user.to_string()))
        .to_request();
    let ack: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ack["status"], "success");
    assert_eq!(ack["message"], "post deleted");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/post/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
}

#[actix_web::test]
async fn test_writes_require_user_header() {
    let fx = fixture();
    let app = test::init_service(App::new().configure(handlers::configure(fx.dyn_store()))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/create/event")
        .set_payload(content_body("entertainment", 0.0, 0.0, "anon"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/update/event/0")
        .insert_header((USER_ID_HEADER, "garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_error_statuses() {
    let fx = fixture();
    let app = test::init_service(App::new().configure(handlers::configure(fx.dyn_store()))).await;

    let req = test::TestRequest::get().uri("/api/v1/comment/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());

    // unknown kind
    let req = test::TestRequest::get().uri("/api/v1/gadget/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/v1/create/thread")
        .insert_header((USER_ID_HEADER, fx.user.to_string()))
        .set_payload("{broken")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/v1/update/thread/not-a-number")
        .insert_header((USER_ID_HEADER, fx.user.to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/api/v1/post/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("invalid path"));

    let req = test::TestRequest::post()
        .uri("/api/v1/thread/abc/comments")
        .insert_header((USER_ID_HEADER, fx.user.to_string()))
        .set_payload(r#"{"content":"x"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/api/v1/edit/thread/77")
        .insert_header((USER_ID_HEADER, fx.user.to_string()))
        .set_payload(r#"{"content":"x"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_around_and_sync() {
    let fx = fixture();
    let app = test::init_service(App::new().configure(handlers::configure(fx.dyn_store()))).await;

    for (category, lat, lng) in [
        ("community", 35.68, 139.76),
        ("disaster", 10.0, 10.0),
        ("community", 50.0, 50.0),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/create/event")
            .insert_header((USER_ID_HEADER, fx.user.to_string()))
            .set_payload(content_body(category, lat, lng, "e"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/around/event")
        .set_payload(coordinate_body(35.685, 139.765))
        .to_request();
    let near: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(near.len(), 2);

    let req = test::TestRequest::post()
        .uri("/api/v1/around/event")
        .to_request();
    let anywhere: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(anywhere.len(), 1);
    assert_eq!(anywhere[0]["category"], "disaster");

    let req = test::TestRequest::get()
        .uri("/api/v1/update/event/0")
        .insert_header((USER_ID_HEADER, fx.user.to_string()))
        .to_request();
    let synced: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(synced.len(), 3);
}

#[actix_web::test]
async fn test_thread_replies_and_comments() {
    let fx = fixture();
    let app = test::init_service(App::new().configure(handlers::configure(fx.dyn_store()))).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/create/thread")
        .insert_header((USER_ID_HEADER, fx.user.to_string()))
        .set_payload(content_body("community", 35.0, 139.0, "topic"))
        .to_request();
    let thread: Value = test::call_and_read_body_json(&app, req).await;
    let thread_id = thread["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/thread/{}/replies", thread_id))
        .insert_header((USER_ID_HEADER, fx.user.to_string()))
        .set_payload(r#"{"content":"reply"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/thread/{}/replies", thread_id))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["reply_count"], 1);
    assert_eq!(view["replies"][0]["parent_id"], thread_id);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/thread/{}/comments", thread_id))
        .insert_header((USER_ID_HEADER, fx.user.to_string()))
        .set_payload(r#"{"content":"comment"}"#)
        .to_request();
    let comment: Value = test::call_and_read_body_json(&app, req).await;
    let comment_id = comment["id"].as_i64().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/comment/{}", comment_id))
        .insert_header((USER_ID_HEADER, fx.user.to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/thread/{}/comments", thread_id))
        .to_request();
    let comments: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(comments.is_empty());
}

#[actix_web::test]
async fn test_health_and_metrics() {
    let fx = fixture();
    let app = test::init_service(App::new().configure(handlers::configure(fx.dyn_store()))).await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let health: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(health["status"], "ok");

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
