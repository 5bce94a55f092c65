//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small blog and a temporary directory
//! for the article tree, and run the full crawl cycle end-to-end.

use blog_gleaner::config::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use blog_gleaner::crawler::{run_crawl, Coordinator};
use blog_gleaner::output::parse_article_index;
use blog_gleaner::state::DoneReason;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the mock site with no delays or retries
fn create_test_config(server: &MockServer, start_urls: Vec<String>, out: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            timeout_seconds: 5,
            max_retries: 0,
            base_backoff_seconds: 2.0,
            backoff_jitter_seconds: 0.0,
            min_delay: 0.0,
            max_delay: 0.0,
            page_budget: 10,
        },
        user_agent: UserAgentConfig::default(),
        site: SiteConfig::new(&host_of(server), start_urls),
        output: OutputConfig {
            base_dir: out.join("articles").to_string_lossy().into_owned(),
            all_articles_dir: "AllArticles".to_string(),
            summary_path: out.join("summary.txt").to_string_lossy().into_owned(),
            max_filename_length: 100,
        },
    }
}

fn host_of(server: &MockServer) -> String {
    url::Url::parse(&server.uri())
        .expect("Failed to parse base URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string()
}

fn listing_page(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>Blog</title></head><body><main>{}</main></body></html>",
        anchors
    )
}

fn article_page(title: &str, body: &str, categories: &[&str]) -> String {
    let cats: String = categories
        .iter()
        .map(|c| format!(r#"<a href="/category/{}">{}</a>"#, c.to_lowercase(), c))
        .collect();
    format!(
        r#"<html><head><title>{title} | Blog</title></head><body>
        <article>
            <h1 class="entry-title">{title}</h1>
            <span class="author">Lee</span>
            <time>2021-05-01</time>
            <div class="entry-content"><p>{body}</p></div>
            <span class="cat-links">{cats}</span>
        </article>
        </body></html>"#
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

async fn mount_listing(server: &MockServer, paged: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/blog/"))
        .and(query_param("paged", paged))
        .respond_with(html(listing_page(links)))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_article(server: &MockServer, route: &str, title: &str, categories: &[&str]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(article_page(title, &format!("Body of {}", title), categories)))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_listing_pages_two_articles() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Each listing links one article and the other listing page
    mount_listing(&server, "1", &["/blog/post-1", "/blog/?paged=2"]).await;
    mount_listing(&server, "2", &["/blog/post-2", "/blog/?paged=1"]).await;
    mount_article(&server, "/blog/post-1", "Post One", &["Tech"]).await;
    mount_article(&server, "/blog/post-2", "Post Two", &["Life"]).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(
        &server,
        vec![
            format!("{}/blog/?paged=1", base),
            format!("{}/blog/?paged=2", base),
        ],
        temp.path(),
    );

    let report = run_crawl(&config).await.expect("crawl should complete");

    assert_eq!(report.pages_visited, 4);
    assert_eq!(report.pages_processed, 4);
    assert_eq!(report.articles.len(), 2);
    assert_eq!(report.done_reason, DoneReason::FrontierExhausted);

    let titles: Vec<&str> = report.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Post One", "Post Two"]);

    let articles = temp.path().join("articles");
    assert!(articles.join("Tech/Post One.txt").exists());
    assert!(articles.join("Life/Post Two.txt").exists());
    assert!(articles.join("AllArticles/Post One.txt").exists());
    assert!(articles.join("AllArticles/Post Two.txt").exists());

    let summary = fs::read_to_string(temp.path().join("summary.txt")).unwrap();
    assert!(summary.contains("Total articles found: 2"));
    assert!(summary.contains("Total pages visited: 4"));
    let index = parse_article_index(&summary);
    assert_eq!(index.len(), 2);
    assert_eq!(index[0].url, format!("{}/blog/post-1", base));

    // Every page fetched exactly once; the mocks' expect(1) is verified on drop
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_frontier_visited_in_fifo_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_article(&server, "/blog/a", "A", &[]).await;
    mount_article(&server, "/blog/b", "B", &[]).await;
    mount_article(&server, "/blog/c", "C", &[]).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(
        &server,
        vec![
            format!("{}/blog/a", base),
            format!("{}/blog/b", base),
            format!("{}/blog/c", base),
        ],
        temp.path(),
    );

    let report = Coordinator::new(&config, &config.site.start_urls)
        .unwrap()
        .run()
        .await;

    let requested: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(requested, vec!["/blog/a", "/blog/b", "/blog/c"]);

    let titles: Vec<&str> = report.articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
    // No categories on the pages
    assert!(report
        .articles
        .iter()
        .all(|a| a.categories == vec!["Uncategorized".to_string()]));
}

#[tokio::test]
async fn test_repeated_links_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Every page links every other page, several times over
    let all = [
        "/blog/?paged=1",
        "/blog/x",
        "/blog/x#comments",
        "/blog/x?utm_source=feed",
        "/blog/y",
    ];
    mount_listing(&server, "1", &all).await;
    Mock::given(method("GET"))
        .and(path("/blog/x"))
        .respond_with(html(format!(
            "{}{}",
            article_page("X", "x body", &["Tech"]),
            listing_page(&all)
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blog/y"))
        .respond_with(html(format!(
            "{}{}",
            article_page("Y", "y body", &["Tech"]),
            listing_page(&all)
        )))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&server, vec![format!("{}/blog/?paged=1", base)], temp.path());

    let report = run_crawl(&config).await.unwrap();

    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.articles.len(), 2);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_failed_page_does_not_stop_run() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_article(&server, "/blog/ok-1", "First", &["Tech"]).await;
    Mock::given(method("GET"))
        .and(path("/blog/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_article(&server, "/blog/ok-2", "Second", &["Tech"]).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(
        &server,
        vec![
            format!("{}/blog/ok-1", base),
            format!("{}/blog/broken", base),
            format!("{}/blog/ok-2", base),
        ],
        temp.path(),
    );

    let report = run_crawl(&config).await.unwrap();

    assert_eq!(report.articles.len(), 2);
    // The failed URL is visited but not counted as processed
    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.pages_processed, 2);
    assert_eq!(report.done_reason, DoneReason::FrontierExhausted);
    assert!(temp.path().join("summary.txt").exists());
}

#[tokio::test]
async fn test_page_budget_stops_run() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_article(&server, "/blog/1", "One", &[]).await;
    mount_article(&server, "/blog/2", "Two", &[]).await;
    Mock::given(method("GET"))
        .and(path("/blog/3"))
        .respond_with(html(article_page("Three", "never", &[])))
        .expect(0)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let mut config = create_test_config(
        &server,
        vec![
            format!("{}/blog/1", base),
            format!("{}/blog/2", base),
            format!("{}/blog/3", base),
        ],
        temp.path(),
    );
    config.crawler.page_budget = 2;

    let report = run_crawl(&config).await.unwrap();

    assert_eq!(report.pages_processed, 2);
    assert_eq!(report.articles.len(), 2);
    assert_eq!(report.done_reason, DoneReason::BudgetReached);
}

#[tokio::test]
async fn test_category_fan_out_on_disk() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_article(&server, "/blog/fan", "Fan: Out?", &["Tech", "Life"]).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&server, vec![format!("{}/blog/fan", base)], temp.path());

    let report = run_crawl(&config).await.unwrap();
    assert_eq!(report.save_failures, 0);

    let articles = temp.path().join("articles");
    let tech = fs::read_to_string(articles.join("Tech/Fan Out.txt")).unwrap();
    let life = fs::read_to_string(articles.join("Life/Fan Out.txt")).unwrap();
    let all = fs::read_to_string(articles.join("AllArticles/Fan Out.txt")).unwrap();
    assert_eq!(tech, life);
    assert_eq!(tech, all);

    assert!(tech.starts_with(&format!(
        "Title: Fan: Out?\nURL: {}/blog/fan\nAuthor: Lee\nDate: 2021-05-01\nCategories: Tech, Life\n",
        base
    )));
    assert!(tech.ends_with("Body of Fan: Out?"));

    let dirs = fs::read_dir(&articles).unwrap().count();
    assert_eq!(dirs, 3);
}

#[tokio::test]
async fn test_empty_article_and_filtered_links() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_listing(
        &server,
        "1",
        &[
            "/blog/empty",
            "/blog/feed",
            "/about",
            "mailto:me@example.com",
            "https://elsewhere.example/blog/offsite",
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/blog/empty"))
        .respond_with(html("<html><body><h1>Nothing here</h1></body></html>".to_string()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blog/feed"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&server, vec![format!("{}/blog/?paged=1", base)], temp.path());

    let report = run_crawl(&config).await.unwrap();

    assert_eq!(report.pages_visited, 2);
    assert!(report.articles.is_empty());
    assert!(!temp.path().join("articles").exists());
}

#[tokio::test]
async fn test_redirect_target_not_fetched_again() {
    let server = MockServer::start().await;
    let base = server.uri();

    // The listing links both the old address and the page it now redirects to
    mount_listing(&server, "1", &["/blog/a-moved", "/blog/z-post"]).await;
    Mock::given(method("GET"))
        .and(path("/blog/a-moved"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/blog/z-post", base).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_article(&server, "/blog/z-post", "Moved Post", &["Tech"]).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(&server, vec![format!("{}/blog/?paged=1", base)], temp.path());

    let report = run_crawl(&config).await.unwrap();

    assert_eq!(report.articles.len(), 1);
    assert_eq!(report.articles[0].title, "Moved Post");
    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.pages_processed, 2);
    // Listing, the redirecting URL and its target; the direct link is not refetched
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}
