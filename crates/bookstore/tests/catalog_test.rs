//! Users and books services. Neither calls a peer.

mod common;

use bookstore::config::{PeerUrls, ServiceKind};
use common::{json, start};
use serde_json::{json, Value};

async fn post(url: String, body: Value) -> reqwest::Response {
    reqwest::Client::new().post(url).json(&body).send().await.unwrap()
}

fn registration(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "password": "correct horse",
        "password2": "correct horse",
        "first_name": "Ada"
    })
}

#[tokio::test]
async fn test_register_and_login() {
    let server = start(ServiceKind::Users, PeerUrls::default()).await;
    let base = server.base_url();

    let registered = post(
        format!("{base}/api/users/register/"),
        registration("ada", "ada@example.com"),
    )
    .await;
    assert_eq!(registered.status(), 201);
    let body = json(registered).await;
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["username"], "ada");
    assert_eq!(body["user"]["first_name"], "Ada");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());

    let login = post(
        format!("{base}/api/users/login/"),
        json!({ "username": "ada", "password": "correct horse" }),
    )
    .await;
    assert_eq!(login.status(), 200);
    let login = json(login).await;
    assert_eq!(login["message"], "Login successful");
    assert_eq!(login["user"]["id"], body["user"]["id"]);

    let wrong = post(
        format!("{base}/api/users/login/"),
        json!({ "username": "ada", "password": "wrong horse" }),
    )
    .await;
    assert_eq!(wrong.status(), 400);
    assert_eq!(
        json(wrong).await,
        json!({ "non_field_errors": ["Invalid credentials"] })
    );

    let nobody = post(
        format!("{base}/api/users/login/"),
        json!({ "username": "grace", "password": "correct horse" }),
    )
    .await;
    assert_eq!(nobody.status(), 400);
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_registration_rules() {
    let server = start(ServiceKind::Users, PeerUrls::default()).await;
    let base = server.base_url();
    let url = format!("{base}/api/users/register/");

    assert_eq!(
        post(url.clone(), registration("ada", "ada@example.com")).await.status(),
        201
    );

    let same_name = post(url.clone(), registration("ada", "other@example.com")).await;
    assert_eq!(same_name.status(), 400);
    assert_eq!(
        json(same_name).await,
        json!({ "username": ["A user with that username already exists."] })
    );

    let same_email = post(url.clone(), registration("grace", "ADA@example.com")).await;
    assert_eq!(same_email.status(), 400);
    assert!(json(same_email).await.get("email").is_some());

    let mut mismatch = registration("grace", "grace@example.com");
    mismatch["password2"] = json!("something else");
    let mismatch = post(url.clone(), mismatch).await;
    assert_eq!(mismatch.status(), 400);
    assert_eq!(
        json(mismatch).await["password"][0],
        "Password fields didn't match."
    );

    let mut short = registration("grace", "grace@example.com");
    short["password"] = json!("short");
    short["password2"] = json!("short");
    assert_eq!(post(url, short).await.status(), 400);

    let users = json(reqwest::get(format!("{base}/api/users/")).await.unwrap()).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_user_profile_updates() {
    let server = start(ServiceKind::Users, PeerUrls::default()).await;
    let base = server.base_url();
    let http = reqwest::Client::new();
    let created = json(
        post(
            format!("{base}/api/users/register/"),
            registration("ada", "ada@example.com"),
        )
        .await,
    )
    .await;
    let id = created["user"]["id"].as_i64().unwrap();

    let patched = http
        .patch(format!("{base}/api/users/{id}/"))
        .json(&json!({ "address": "12 Analytical Way" }))
        .send()
        .await
        .unwrap();
    assert_eq!(patched.status(), 200);
    let patched = json(patched).await;
    assert_eq!(patched["address"], "12 Analytical Way");
    assert_eq!(patched["first_name"], "Ada");

    // Password is unchanged by profile edits.
    let login = post(
        format!("{base}/api/users/login/"),
        json!({ "username": "ada", "password": "correct horse" }),
    )
    .await;
    assert_eq!(login.status(), 200);

    let missing = http.get(format!("{base}/api/users/99/")).send().await.unwrap();
    assert_eq!(missing.status(), 404);
    assert_eq!(json(missing).await["error"], "User 99 not found");
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_books_with_categories() {
    let server = start(ServiceKind::Books, PeerUrls::default()).await;
    let base = server.base_url();
    let http = reqwest::Client::new();

    let fiction = json(
        post(
            format!("{base}/api/categories/"),
            json!({ "name": "Fiction", "description": "Made up" }),
        )
        .await,
    )
    .await;
    let category_id = fiction["id"].as_i64().unwrap();

    let dune = post(
        format!("{base}/api/books/"),
        json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "price": "9.99",
            "category": category_id,
            "stock": 10,
            "isbn": "9780441013593",
            "published_date": "1965-08-01"
        }),
    )
    .await;
    assert_eq!(dune.status(), 201);
    let dune = json(dune).await;
    assert_eq!(dune["price"], "9.99");
    assert_eq!(dune["category"], category_id);
    assert_eq!(dune["category_name"], "Fiction");
    assert_eq!(dune["published_date"], "1965-08-01");

    let unknown = post(
        format!("{base}/api/books/"),
        json!({ "title": "Ghost", "author": "Nobody", "price": 1, "category": 999 }),
    )
    .await;
    assert_eq!(unknown.status(), 400);
    assert_eq!(
        json(unknown).await,
        json!({ "category": ["Invalid pk \"999\" - object does not exist."] })
    );

    let priceless = post(
        format!("{base}/api/books/"),
        json!({ "title": "Ghost", "author": "Nobody", "price": null }),
    )
    .await;
    assert_eq!(priceless.status(), 400);
    assert_eq!(
        json(priceless).await,
        json!({ "price": ["This field may not be null."] })
    );

    let by_category = json(
        http.get(format!("{base}/api/books/by_category/?category_id={category_id}"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(by_category.as_array().unwrap().len(), 1);

    let deleted = http
        .delete(format!("{base}/api/categories/{category_id}/"))
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status(), 204);
    let orphan = json(
        http.get(format!("{base}/api/books/{}/", dune["id"]))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(orphan["category"], Value::Null);
    assert_eq!(orphan["category_name"], Value::Null);
    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_book_search_and_updates() {
    let server = start(ServiceKind::Books, PeerUrls::default()).await;
    let base = server.base_url();
    let http = reqwest::Client::new();
    for (title, author) in [
        ("Dune", "Frank Herbert"),
        ("Children of Dune", "Frank Herbert"),
        ("Neuromancer", "William Gibson"),
    ] {
        let response = post(
            format!("{base}/api/books/"),
            json!({ "title": title, "author": author, "price": "5.00" }),
        )
        .await;
        assert_eq!(response.status(), 201);
    }

    let titles = |books: &Value| -> Vec<String> {
        books
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["title"].as_str().unwrap().to_string())
            .collect()
    };

    let by_author = json(
        http.get(format!("{base}/api/books/by_author/?author=herbert"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(titles(&by_author), ["Dune", "Children of Dune"]);

    let search = json(
        http.get(format!("{base}/api/books/search/?q=GIB"))
            .send()
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(titles(&search), ["Neuromancer"]);

    let no_query = http.get(format!("{base}/api/books/search/")).send().await.unwrap();
    assert_eq!(no_query.status(), 400);
    assert_eq!(json(no_query).await["error"], "q parameter required");

    let patched = http
        .patch(format!("{base}/api/books/1/"))
        .json(&json!({ "price": "12.50", "stock": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(patched.status(), 200);
    let patched = json(patched).await;
    assert_eq!(patched["price"], "12.50");
    assert_eq!(patched["stock"], 3);
    assert_eq!(patched["title"], "Dune");

    let negative = http
        .patch(format!("{base}/api/books/1/"))
        .json(&json!({ "stock": -1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(negative.status(), 400);

    let cleared = http
        .patch(format!("{base}/api/books/1/"))
        .json(&json!({ "price": null }))
        .send()
        .await
        .unwrap();
    assert_eq!(cleared.status(), 400);

    let missing = http.get(format!("{base}/api/books/99/")).send().await.unwrap();
    assert_eq!(missing.status(), 404);
    assert_eq!(json(missing).await["error"], "Book 99 not found");
    server.shutdown().await.unwrap();
}
