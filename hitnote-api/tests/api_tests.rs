//! Integration tests for the HitNote API endpoints
//!
//! Each test builds the full router over a throwaway database and drives
//! it with `tower::ServiceExt::oneshot`. Status-code mapping is part of
//! the contract under test: 401 for credential failures, 403 vs 404
//! disambiguation for ownership-conditioned mutations, 400 for
//! validation and conflicts.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use hitnote_api::{build_router, genius::GeniusClient, AppState};
use hitnote_common::db::{init, Db};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt;

const JWT_SECRET: &[u8] = b"test-secret";

async fn setup_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = Db::new(&dir.path().join("hitnote_test.db"));
    init::create_all_tables(&db).await.expect("bootstrap");

    let genius = GeniusClient::new("http://127.0.0.1:9".to_string(), String::new());
    let state = AppState::new(db, JWT_SECRET.to_vec(), genius);
    (build_router(state), dir)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn send(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}

/// Register a user and log in, returning (user id, access token).
async fn register_and_login(app: &Router, nome: &str, email: &str) -> (i64, String) {
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/usuarios",
            None,
            &json!({ "nome": nome, "username": nome, "email": email, "senha": "segredo123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/login",
            None,
            &json!({ "email": email, "senha": "segredo123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["token_type"], "bearer");
    (
        body["usuario"]["id"].as_i64().unwrap(),
        body["access_token"].as_str().unwrap().to_string(),
    )
}

async fn create_music(app: &Router, nome: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/musicas",
            None,
            &json!({ "nome": nome, "artista": "Artista", "album": "Album" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

#[tokio::test]
async fn health_endpoint() {
    let (app, _dir) = setup_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "hitnote-api");
}

#[tokio::test]
async fn register_login_and_profile_flow() {
    let (app, _dir) = setup_app().await;
    let (id, token) = register_and_login(&app, "Ana", "ana@example.com").await;

    let response = app.clone().oneshot(get_auth("/usuarios/me", &token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"].as_i64().unwrap(), id);
    assert_eq!(body["email"], "ana@example.com");
    assert_eq!(body["stats"]["total_reviews"], 0);
    assert_eq!(body["stats"]["media_reviews"], 0.0);
    // The password hash never leaves the backend.
    assert!(body.get("senha").is_none());
}

#[tokio::test]
async fn duplicate_email_registration_is_rejected() {
    let (app, _dir) = setup_app().await;
    register_and_login(&app, "Ana", "ana@example.com").await;

    let response = app
        .oneshot(send_json(
            "POST",
            "/usuarios",
            None,
            &json!({ "nome": "Outra", "username": "outra", "email": "ana@example.com", "senha": "x12345" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Email já cadastrado");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let (app, _dir) = setup_app().await;
    register_and_login(&app, "Ana", "ana@example.com").await;

    let wrong_password = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/login",
            None,
            &json!({ "email": "ana@example.com", "senha": "errada" }),
        ))
        .await
        .unwrap();

    let unknown_account = app
        .oneshot(send_json(
            "POST",
            "/login",
            None,
            &json!({ "email": "ninguem@example.com", "senha": "errada" }),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_account.status(), StatusCode::UNAUTHORIZED);

    let a = body_json(wrong_password).await;
    let b = body_json(unknown_account).await;
    assert_eq!(a["detail"], b["detail"]);
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let (app, _dir) = setup_app().await;

    let missing = app.clone().oneshot(get("/usuarios/me")).await.unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        missing.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );

    let garbage = app.oneshot(get_auth("/usuarios/me", "not-a-token")).await.unwrap();
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn music_creation_deduplicates_by_triple() {
    let (app, _dir) = setup_app().await;

    let first = create_music(&app, "Imagine").await;

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/musicas",
            None,
            &json!({ "nome": "IMAGINE", "artista": "artista", "album": "album" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["id"].as_i64().unwrap(), first);

    let response = app.oneshot(get("/musicas")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn absurd_page_number_returns_an_empty_page() {
    let (app, _dir) = setup_app().await;
    create_music(&app, "Imagine").await;

    // The offset computation must saturate instead of overflowing.
    let response = app
        .oneshot(get(&format!("/musicas?page={}", i64::MAX)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_music_is_404() {
    let (app, _dir) = setup_app().await;

    let response = app.oneshot(get("/musicas/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["detail"], "Música não encontrada");
}

#[tokio::test]
async fn review_flow_with_rating() {
    let (app, _dir) = setup_app().await;
    let (user_id, token) = register_and_login(&app, "Ana", "ana@example.com").await;
    let musica_id = create_music(&app, "Imagine").await;

    // Unauthenticated review is rejected.
    let anon = app
        .clone()
        .oneshot(send_json(
            "POST",
            &format!("/musicas/{}/reviews", musica_id),
            None,
            &json!({ "nota": 4.5, "comentario": "boa" }),
        ))
        .await
        .unwrap();
    assert_eq!(anon.status(), StatusCode::UNAUTHORIZED);

    // Out-of-range rating is invalid input.
    let invalid = app
        .clone()
        .oneshot(send_json(
            "POST",
            &format!("/musicas/{}/reviews", musica_id),
            Some(&token),
            &json!({ "nota": 5.5, "comentario": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let created = app
        .clone()
        .oneshot(send_json(
            "POST",
            &format!("/musicas/{}/reviews", musica_id),
            Some(&token),
            &json!({ "nota": 4.0, "comentario": "clássico" }),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);

    let body = body_json(created).await;
    assert_eq!(body["musica"], "Imagine");
    assert_eq!(body["autor"], "Ana");
    assert_eq!(body["autor_id"].as_i64().unwrap(), user_id);

    let rating = app
        .oneshot(get(&format!("/musicas/{}/rating", musica_id)))
        .await
        .unwrap();
    let body = body_json(rating).await;
    assert_eq!(body["qtde"], 1);
    assert_eq!(body["media"], 4.0);
}

#[tokio::test]
async fn like_toggle_round_trip() {
    let (app, _dir) = setup_app().await;
    let (_id, token) = register_and_login(&app, "Ana", "ana@example.com").await;
    let musica_id = create_music(&app, "Imagine").await;

    let like_uri = format!("/musicas/{}/like", musica_id);

    let on = app.clone().oneshot(send("POST", &like_uri, Some(&token))).await.unwrap();
    assert_eq!(body_json(on).await["is_liked"], true);

    let status = app.clone().oneshot(get_auth(&like_uri, &token)).await.unwrap();
    assert_eq!(body_json(status).await["is_liked"], true);

    let my_likes = app
        .clone()
        .oneshot(get_auth("/usuarios/me/curtidas", &token))
        .await
        .unwrap();
    assert_eq!(body_json(my_likes).await.as_array().unwrap().len(), 1);

    let off = app.clone().oneshot(send("POST", &like_uri, Some(&token))).await.unwrap();
    assert_eq!(body_json(off).await["is_liked"], false);

    let my_likes = app.oneshot(get_auth("/usuarios/me/curtidas", &token)).await.unwrap();
    assert!(body_json(my_likes).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn follow_toggle_and_public_profile() {
    let (app, _dir) = setup_app().await;
    let (ana_id, ana_token) = register_and_login(&app, "Ana", "ana@example.com").await;
    let (bia_id, _) = register_and_login(&app, "Bia", "bia@example.com").await;

    let follow_uri = format!("/usuarios/{}/seguir", bia_id);
    let on = app
        .clone()
        .oneshot(send("POST", &follow_uri, Some(&ana_token)))
        .await
        .unwrap();
    assert_eq!(body_json(on).await["is_following"], true);

    // Self-follow maps to 400.
    let self_follow = app
        .clone()
        .oneshot(send("POST", &format!("/usuarios/{}/seguir", ana_id), Some(&ana_token)))
        .await
        .unwrap();
    assert_eq!(self_follow.status(), StatusCode::BAD_REQUEST);

    let profile = app
        .clone()
        .oneshot(get_auth(&format!("/usuarios/{}", bia_id), &ana_token))
        .await
        .unwrap();
    let body = body_json(profile).await;
    assert_eq!(body["is_following"], true);
    assert_eq!(body["stats"]["followers"], 1);

    // Anonymous viewers get no is_following.
    let anon = app.oneshot(get(&format!("/usuarios/{}", bia_id))).await.unwrap();
    let body = body_json(anon).await;
    assert!(body["is_following"].is_null());
}

#[tokio::test]
async fn list_edit_distinguishes_missing_from_not_owned() {
    let (app, _dir) = setup_app().await;
    let (_ana_id, ana_token) = register_and_login(&app, "Ana", "ana@example.com").await;
    let (_bia_id, bia_token) = register_and_login(&app, "Bia", "bia@example.com").await;

    let created = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/listas",
            Some(&ana_token),
            &json!({ "nome": "Favoritas", "descricao": "as melhores", "publica": true }),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let lista_id = body_json(created).await["id"].as_i64().unwrap();

    let update = json!({ "nome": "Hackeada", "descricao": "", "publica": false });

    // Someone else's list: 403.
    let forbidden = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/listas/{}", lista_id),
            Some(&bia_token),
            &update,
        ))
        .await
        .unwrap();
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    // Nonexistent list: 404.
    let missing = app
        .clone()
        .oneshot(send_json("PUT", "/listas/9999", Some(&bia_token), &update))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    // Owner succeeds.
    let ok = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/listas/{}", lista_id),
            Some(&ana_token),
            &json!({ "nome": "Renomeada", "descricao": "as melhores", "publica": true }),
        ))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(body_json(ok).await["nome"], "Renomeada");
}

#[tokio::test]
async fn private_lists_are_hidden_from_other_viewers() {
    let (app, _dir) = setup_app().await;
    let (ana_id, ana_token) = register_and_login(&app, "Ana", "ana@example.com").await;
    let (_bia_id, bia_token) = register_and_login(&app, "Bia", "bia@example.com").await;

    for (nome, publica) in [("Pública", true), ("Secreta", false)] {
        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                "/listas",
                Some(&ana_token),
                &json!({ "nome": nome, "descricao": "", "publica": publica }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let lists_uri = format!("/usuarios/{}/listas", ana_id);

    let own = app.clone().oneshot(get_auth(&lists_uri, &ana_token)).await.unwrap();
    assert_eq!(body_json(own).await.as_array().unwrap().len(), 2);

    let other = app.clone().oneshot(get_auth(&lists_uri, &bia_token)).await.unwrap();
    let body = body_json(other).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["nome"], "Pública");

    let anon = app.oneshot(get(&lists_uri)).await.unwrap();
    assert_eq!(body_json(anon).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_membership_flow_checks_ownership() {
    let (app, _dir) = setup_app().await;
    let (_ana_id, ana_token) = register_and_login(&app, "Ana", "ana@example.com").await;
    let (_bia_id, bia_token) = register_and_login(&app, "Bia", "bia@example.com").await;
    let musica_id = create_music(&app, "Imagine").await;

    let created = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/listas",
            Some(&ana_token),
            &json!({ "nome": "Mix", "descricao": "", "publica": true }),
        ))
        .await
        .unwrap();
    let lista_id = body_json(created).await["id"].as_i64().unwrap();

    let member_uri = format!("/listas/{}/musicas/{}", lista_id, musica_id);

    // Only the owner may mutate membership; the store itself checks nothing.
    let intruder = app
        .clone()
        .oneshot(send("POST", &member_uri, Some(&bia_token)))
        .await
        .unwrap();
    assert_eq!(intruder.status(), StatusCode::FORBIDDEN);

    let added = app.clone().oneshot(send("POST", &member_uri, Some(&ana_token))).await.unwrap();
    assert_eq!(added.status(), StatusCode::NO_CONTENT);

    let detail = app.clone().oneshot(get(&format!("/listas/{}", lista_id))).await.unwrap();
    let body = body_json(detail).await;
    assert_eq!(body["song_count"], 1);
    assert_eq!(body["items"][0]["nome"], "Imagine");

    let removed = app
        .clone()
        .oneshot(send("DELETE", &member_uri, Some(&ana_token)))
        .await
        .unwrap();
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);

    let detail = app.oneshot(get(&format!("/listas/{}", lista_id))).await.unwrap();
    assert_eq!(body_json(detail).await["song_count"], 0);
}

#[tokio::test]
async fn private_list_detail_requires_the_owner() {
    let (app, _dir) = setup_app().await;
    let (_ana_id, ana_token) = register_and_login(&app, "Ana", "ana@example.com").await;
    let (_bia_id, bia_token) = register_and_login(&app, "Bia", "bia@example.com").await;

    let created = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/listas",
            Some(&ana_token),
            &json!({ "nome": "Secreta", "descricao": "", "publica": false }),
        ))
        .await
        .unwrap();
    let lista_id = body_json(created).await["id"].as_i64().unwrap();
    let detail_uri = format!("/listas/{}", lista_id);

    let owner = app.clone().oneshot(get_auth(&detail_uri, &ana_token)).await.unwrap();
    assert_eq!(owner.status(), StatusCode::OK);

    let other = app.clone().oneshot(get_auth(&detail_uri, &bia_token)).await.unwrap();
    assert_eq!(other.status(), StatusCode::FORBIDDEN);

    let anon = app.oneshot(get(&detail_uri)).await.unwrap();
    assert_eq!(anon.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn feed_endpoint_merges_reviews_then_lists() {
    let (app, _dir) = setup_app().await;
    let (ana_id, token) = register_and_login(&app, "Ana", "ana@example.com").await;
    let musica_id = create_music(&app, "Imagine").await;

    for i in 0..3 {
        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                &format!("/musicas/{}/reviews", musica_id),
                Some(&token),
                &json!({ "nota": 4.0, "comentario": format!("review {}", i) }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/listas",
            Some(&token),
            &json!({ "nome": "Mix", "descricao": "", "publica": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let feed = app
        .oneshot(get(&format!("/usuarios/{}/feed", ana_id)))
        .await
        .unwrap();
    assert_eq!(feed.status(), StatusCode::OK);

    let body = body_json(feed).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert!(items[0]["id"].as_str().unwrap().starts_with("rev_"));
    assert_eq!(items[0]["comentario"], "review 2");
    assert!(items[3]["id"].as_str().unwrap().starts_with("list_"));
    assert!(items[3]["acao"].as_str().unwrap().contains("Mix"));
}

#[tokio::test]
async fn user_search_returns_public_fields() {
    let (app, _dir) = setup_app().await;
    register_and_login(&app, "Ana", "ana@example.com").await;
    register_and_login(&app, "Bruno", "bruno@example.com").await;

    let response = app.oneshot(get("/usuarios/busca?q=ana")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["nome"], "Ana");
    assert!(items[0].get("email").is_none());
}
