//! Route-level tests for login, listing, adding, lending and returning books

use axum::http::StatusCode;
use bookshelf_server::{config::AppConfig, models::LendingStatus};
use serde_json::Value;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_protected_routes_redirect_to_login() {
    let mut app = TestApp::spawn().await;

    for path in ["/", "/lent_books", "/add_book", "/lend_book/1", "/return_book/1", "/logout"] {
        let response = app.get(path).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(response.location.as_deref(), Some("/login"), "{}", path);
    }

    let response = app.post_form("/add_book", "title=Dune&author=Herbert&room=A&shelf=1").await;
    assert_eq!(response.location.as_deref(), Some("/login"));
    assert_eq!(app.book_count().await, 0);
}

#[tokio::test]
async fn test_login_page_renders() {
    let mut app = TestApp::spawn().await;
    let response = app.get("/login").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(r#"name="username""#));
    assert!(response.body.contains(r#"name="password""#));
}

#[tokio::test]
async fn test_login_success_establishes_session() {
    let mut app = TestApp::spawn().await;

    let response = app.login().await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));
    assert!(app.has_cookie("session"));

    let response = app.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("No books found."));
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let mut app = TestApp::spawn().await;

    for form in [
        "username=admin&password=wrong",
        "username=nobody&password=password",
        "username=admin",
        "password=password",
        "username=&password=",
    ] {
        let response = app.post_form("/login", form).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{}", form);
        assert!(response.body.contains("Invalid username or password"), "{}", form);
        assert!(!app.has_cookie("session"), "{}", form);
    }

    assert_eq!(app.get("/").await.location.as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_logout_destroys_session() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    let response = app.get("/logout").await;
    assert_eq!(response.location.as_deref(), Some("/login"));
    assert!(!app.has_cookie("session"));

    let response = app.follow(&response).await;
    assert!(response.body.contains("You have been logged out"));

    assert_eq!(app.get("/").await.location.as_deref(), Some("/login"));
}

#[tokio::test]
async fn test_logging_in_again_replaces_the_session() {
    let mut app = TestApp::spawn().await;
    app.login().await;
    app.login().await;
    app.login().await;

    let counts = app.state.services.stats.counts().await.unwrap();
    assert_eq!(counts.sessions, 1);
    assert_eq!(app.get("/").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logged_out_session_cannot_be_resolved() {
    let app = TestApp::spawn().await;
    let (token, _) = app.state.services.auth.login("admin", "password").await.unwrap();

    app.state.services.auth.logout(&token).await.unwrap();
    assert!(app.state.services.auth.resolve_session(&token).await.is_err());
}

#[tokio::test]
async fn test_add_book_success() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    let form = app.get("/add_book").await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.body.contains(r#"action="/add_book""#));

    let response = app.post_form("/add_book", "title=Dune&author=Herbert&room=A&shelf=1").await;
    assert_eq!(response.location.as_deref(), Some("/"));

    let page = app.follow(&response).await;
    assert!(page.body.contains("Book added successfully!"));
    assert!(page.body.contains("<td>Dune</td><td>Herbert</td><td>A</td><td>1</td>"));

    // Flash messages are shown once
    let page = app.get("/").await;
    assert!(!page.body.contains("Book added successfully!"));

    let books = app.state.services.books.list_books().await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].status, LendingStatus::Available);
}

#[tokio::test]
async fn test_add_book_with_any_field_missing_or_blank_creates_nothing() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    let fields = [("title", "Dune"), ("author", "Herbert"), ("room", "A"), ("shelf", "1")];

    for (skipped, _) in fields {
        for blank in [None, Some("%20%20")] {
            let form = fields
                .iter()
                .filter_map(|&(name, value)| match (name == skipped, blank) {
                    (false, _) => Some(format!("{}={}", name, value)),
                    (true, Some(blank)) => Some(format!("{}={}", name, blank)),
                    (true, None) => None,
                })
                .collect::<Vec<_>>()
                .join("&");

            let response = app.post_form("/add_book", &form).await;
            assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY, "{}", form);
            assert!(response.body.contains("Please fill in all fields"), "{}", form);
            assert_eq!(app.book_count().await, 0, "{}", form);
        }
    }

    let response = app.post_form("/add_book", "title=Dune&room=A&shelf=1").await;
    assert!(response.body.contains(r#"name="title" value="Dune""#));
}

#[tokio::test]
async fn test_lend_and_return_scenario() {
    let mut app = TestApp::spawn().await;
    let dune = app.add_book("Dune", "Herbert", "A", "1").await;
    app.login().await;

    // Lend to Alice
    let form = app.get(&format!("/lend_book/{}", dune.id)).await;
    assert_eq!(form.status, StatusCode::OK);
    assert!(form.body.contains(r#"name="borrower""#));

    let response = app.post_form(&format!("/lend_book/{}", dune.id), "borrower=Alice").await;
    assert_eq!(response.location.as_deref(), Some("/"));
    let page = app.follow(&response).await;
    assert!(page.body.contains("lent to Alice"));
    assert!(page.body.contains("Lent to Alice on"));

    let lent = app.book(dune.id).await;
    assert!(lent.status.is_lent());
    assert_eq!(lent.status.borrower(), Some("Alice"));

    // Lending again is rejected and changes nothing
    let response = app.post_form(&format!("/lend_book/{}", dune.id), "borrower=Bob").await;
    let page = app.follow(&response).await;
    assert!(page.body.contains("is already lent"));
    assert_eq!(app.book(dune.id).await, lent);

    let response = app.get(&format!("/lend_book/{}", dune.id)).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(app.book(dune.id).await, lent);

    // Return
    let response = app.get(&format!("/return_book/{}", dune.id)).await;
    let page = app.follow(&response).await;
    assert!(page.body.contains("returned"));

    let returned = app.book(dune.id).await;
    assert_eq!(returned.status, LendingStatus::Available);
    assert_eq!(returned.status.borrower(), None);

    // Returning again is rejected and changes nothing
    let response = app.get(&format!("/return_book/{}", dune.id)).await;
    let page = app.follow(&response).await;
    assert!(page.body.contains("is not currently lent"));
    assert_eq!(app.book(dune.id).await, returned);
}

#[tokio::test]
async fn test_lend_requires_borrower() {
    let mut app = TestApp::spawn().await;
    let dune = app.add_book("Dune", "Herbert", "A", "1").await;
    app.login().await;

    let response = app.post_form(&format!("/lend_book/{}", dune.id), "borrower=").await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Please enter the borrower"));
    assert_eq!(app.book(dune.id).await, dune);
}

#[tokio::test]
async fn test_long_title_and_borrower_still_fit_in_flash() {
    let mut app = TestApp::spawn().await;
    let title = "T".repeat(5000);
    let book = app.add_book(&title, "Herbert", "A", "1").await;
    app.login().await;

    let borrower = "B".repeat(5000);
    let response = app
        .post_form(&format!("/lend_book/{}", book.id), &format!("borrower={}", borrower))
        .await;
    assert_eq!(response.location.as_deref(), Some("/"));
    assert!(app.cookie_len("flash").unwrap() < 4096);

    let page = app.follow(&response).await;
    assert!(page.body.contains(r#"<p class="flash">&quot;TTTT"#));
    assert!(page.body.contains("lent to BBBB"));
    assert_eq!(app.book(book.id).await.status.borrower(), Some(borrower.as_str()));

    let response = app.get(&format!("/return_book/{}", book.id)).await;
    assert!(app.cookie_len("flash").unwrap() < 4096);
    let page = app.follow(&response).await;
    assert!(page.body.contains("returned"));
}

#[tokio::test]
async fn test_unknown_book_reports_not_found() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    for (path, form) in [
        ("/lend_book/999", None),
        ("/lend_book/999", Some("borrower=Alice")),
        ("/return_book/999", None),
    ] {
        let response = match form {
            Some(form) => app.post_form(path, form).await,
            None => app.get(path).await,
        };
        assert_eq!(response.location.as_deref(), Some("/"), "{}", path);
        let page = app.follow(&response).await;
        assert!(page.body.contains("Book with id 999 not found"), "{}", path);
    }
}

#[tokio::test]
async fn test_lent_books_lists_only_lent() {
    let mut app = TestApp::spawn().await;
    let dune = app.add_book("Dune", "Herbert", "A", "1").await;
    app.add_book("Emma", "Austen", "B", "2").await;
    app.state.services.books.lend_book(dune.id, "Alice").await.unwrap();
    app.login().await;

    let page = app.get("/lent_books").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Dune"));
    assert!(!page.body.contains("Emma"));

    let page = app.get("/").await;
    assert!(page.body.contains("Dune"));
    assert!(page.body.contains("Emma"));
}

#[tokio::test]
async fn test_lending_invariant_holds_for_every_book() {
    let app = TestApp::spawn().await;
    let books = app.state.services.books.clone();

    let a = app.add_book("Dune", "Herbert", "A", "1").await;
    let b = app.add_book("Emma", "Austen", "B", "2").await;
    books.lend_book(a.id, "Alice").await.unwrap();
    books.lend_book(b.id, "Bob").await.unwrap();
    books.return_book(a.id).await.unwrap();
    let _ = books.return_book(a.id).await;
    let _ = books.lend_book(b.id, "Carol").await;

    for book in books.list_books().await.unwrap() {
        assert_eq!(book.status.is_lent(), book.status.borrower().is_some());
        assert_eq!(book.status.is_lent(), book.status.lent_since().is_some());
    }
    assert_eq!(app.book(b.id).await.status.borrower(), Some("Bob"));
}

#[tokio::test]
async fn test_health_and_readiness() {
    let mut app = TestApp::spawn().await;

    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["status"], "healthy");

    let response = app.get("/ready").await;
    assert_eq!(response.status, StatusCode::OK);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_debug_route_hidden_by_default() {
    let mut app = TestApp::spawn().await;
    app.login().await;

    assert_eq!(app.get("/debug").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_debug_route_when_enabled() {
    let mut config = AppConfig::default();
    config.diagnostics.enabled = true;
    let mut app = TestApp::spawn_with(config).await;
    app.add_book("Dune", "Herbert", "A", "1").await;

    assert_eq!(app.get("/debug").await.location.as_deref(), Some("/login"));

    app.login().await;
    let response = app.get("/debug").await;
    assert_eq!(response.status, StatusCode::OK);
    let body: Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body["users"], 1);
    assert_eq!(body["books"], 1);
    assert_eq!(body["sessions"], 1);
}
