// ABOUTME: Integration tests harvesting a local portfolio site over plain HTTP
// ABOUTME: Exercises page failure isolation, regex extraction and the content cache end to end
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::Html, routing::get, Router};
use folio_relay::constants::content::PLACEHOLDER;
use folio_relay::harvester::{
    CachedHarvester, ContentHarvester, Extraction, Harvester, HttpPageBackend,
};
use tokio::net::TcpListener;
use url::Url;

const ABOUT_HTML: &str = r#"<!doctype html>
<html><head><title>Me</title><style>body { color: red; }</style></head>
<body>
  <nav>Home About Projects</nav>
  <section data-section="about"><p>Software engineer</p><p>building   small &amp; fast tools</p></section>
  <div class="card experience">Five years of backend work</div>
  <div id="skills"><ul><li>Rust</li><li>TypeScript</li></ul></div>
</body></html>"#;

const PROJECTS_HTML: &str = r#"<html><body>
  <article data-project="relay">Early draft</article>
  <article data-project="relay">Chat relay for this site</article>
  <article data-project="scraper"><h3>Scraper</h3><p>Reads pages</p></article>
</body></html>"#;

const CONTACT_HTML: &str = r#"<html><body>
  <a data-contact="email" href="mailto:me@example.com">me@example.com</a>
  <a data-contact="github" href="https://github.com/me">github.com/me</a>
</body></html>"#;

/// Serve the portfolio pages; `/projects` answers 500 unless `projects_up`
async fn spawn_site(projects_up: bool) -> (Url, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));

    let projects = if projects_up {
        get(|| async { (StatusCode::OK, Html(PROJECTS_HTML)) })
    } else {
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Html("boom")) })
    };
    let app = Router::new()
        .route(
            "/about",
            get(|State(hits): State<Arc<AtomicUsize>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Html(ABOUT_HTML)
            }),
        )
        .route("/projects", projects)
        .route("/contact", get(|| async { Html(CONTACT_HTML) }))
        .with_state(hits.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Url::parse(&format!("http://{addr}")).unwrap(), hits)
}

fn html_harvester() -> Harvester {
    let backend = HttpPageBackend::new(Duration::from_secs(5)).unwrap();
    Harvester::new(Arc::new(backend), Extraction::Pattern)
}

#[tokio::test]
async fn test_harvest_full_site() {
    let (base_url, _) = spawn_site(true).await;

    let content = html_harvester().harvest(&base_url).await;

    assert_eq!(content.about, "Software engineer building small & fast tools");
    assert_eq!(content.experience, "Five years of backend work");
    assert_eq!(content.skills, "Rust TypeScript");
    assert_eq!(content.education, PLACEHOLDER);
    assert_eq!(content.projects.len(), 2);
    assert_eq!(content.projects["relay"], "Chat relay for this site");
    assert_eq!(content.projects["scraper"], "Scraper Reads pages");
    assert_eq!(content.contact["email"], "me@example.com");
    assert_eq!(content.contact["github"], "github.com/me");
}

#[tokio::test]
async fn test_failed_page_keeps_other_pages() {
    let (base_url, _) = spawn_site(false).await;

    let content = html_harvester().harvest(&base_url).await;

    assert_eq!(content.about, "Software engineer building small & fast tools");
    assert!(content.projects.is_empty());
    assert_eq!(content.contact.len(), 2);
}

#[tokio::test]
async fn test_unreachable_site_yields_placeholders() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let base_url = Url::parse(&format!("http://{addr}")).unwrap();

    let content = html_harvester().harvest(&base_url).await;

    assert!(content.is_placeholder());
}

#[tokio::test]
async fn test_cache_serves_repeat_harvests() {
    let (base_url, hits) = spawn_site(true).await;
    let cached = CachedHarvester::new(Arc::new(html_harvester()), Duration::from_secs(60));

    let first = cached.harvest(&base_url).await;
    let second = cached.harvest(&base_url).await;

    assert_eq!(first, second);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
