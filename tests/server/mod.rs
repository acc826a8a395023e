use actix_web::{App, HttpResponse, HttpServer, web};
use std::net::TcpListener;
use std::time::Duration;

/// How long `/slow` stalls before answering
#[allow(dead_code)]
pub const SLOW_PAGE_DELAY: Duration = Duration::from_secs(3);

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(format!("<!DOCTYPE html><html><body>{}</body></html>", body))
}

fn xml(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type("application/xml").body(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>{}"#,
        body
    ))
}

fn urlset(base: &str, paths: &[&str]) -> HttpResponse {
    let urls: String = paths
        .iter()
        .map(|p| format!("<url><loc>{}{}</loc></url>", base, p))
        .collect();
    xml(format!(
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        urls
    ))
}

fn sitemap_index(base: &str, paths: &[&str]) -> HttpResponse {
    let sitemaps: String = paths
        .iter()
        .map(|p| format!("<sitemap><loc>{}{}</loc></sitemap>", base, p))
        .collect();
    xml(format!(
        r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        sitemaps
    ))
}

/// Ten links: 3 nofollow, 2 external
const LINKS_PAGE: &str = r#"
<nav>
  <a href="/">Home</a>
  <a href="/about">About</a>
  <a href="/contact">Contact</a>
</nav>
<main>
  <a href="/blog/post-1">Read the post</a>
  <a href="/products" rel="nofollow">Products</a>
  <a href="/help" rel="nofollow">Help center</a>
  <a href="/careers">Jobs</a>
</main>
<footer>
  <a href="/privacy-policy">Privacy policy</a>
  <a href="https://twitter.com/acme" rel="nofollow">Twitter</a>
  <a href="https://partner.example.org/">Partner</a>
</footer>
"#;

async fn links_page() -> HttpResponse {
    html(LINKS_PAGE.to_string())
}

async fn slow_page() -> HttpResponse {
    tokio::time::sleep(SLOW_PAGE_DELAY).await;
    html(LINKS_PAGE.to_string())
}

async fn numbered_page(path: web::Path<u32>) -> HttpResponse {
    let n = path.into_inner();
    html(format!(
        r#"<a href="/">Home</a><a href="/about">About</a><a href="/blog/{n}">Post {n}</a>"#
    ))
}

async fn empty_page() -> HttpResponse {
    html("<p>Nothing to see here.</p>".to_string())
}

async fn check_page(base: web::Data<String>) -> HttpResponse {
    html(format!(
        r#"<a href="{base}/ok">Alive</a>
           <a href="{base}/not-found">Gone</a>
           <a href="{base}/error">Broken server</a>
           <a href="/ok">Alive again</a>
           <a href="http://127.0.0.1:1/unreachable">Unreachable</a>"#,
        base = base.as_str()
    ))
}

async fn root_sitemap(base: web::Data<String>) -> HttpResponse {
    urlset(&base, &["/page/1", "/slow", "/page/3"])
}

async fn index_sitemap(base: web::Data<String>) -> HttpResponse {
    sitemap_index(
        &base,
        &[
            "/sitemap-a.xml",
            "/sitemap-missing.xml",
            "/sitemap-b.xml",
            "/sitemap-broken.xml",
            "/sitemap-index.xml",
        ],
    )
}

async fn sitemap_a(base: web::Data<String>) -> HttpResponse {
    urlset(&base, &["/page/1", "/page/2"])
}

async fn sitemap_b(base: web::Data<String>) -> HttpResponse {
    urlset(&base, &["/page/2", "/page/3", "/empty"])
}

async fn big_sitemap(base: web::Data<String>) -> HttpResponse {
    let paths: Vec<String> = (1..=30).map(|n| format!("/page/{}", n)).collect();
    let paths: Vec<&str> = paths.iter().map(String::as_str).collect();
    urlset(&base, &paths)
}

async fn pages_sitemap(base: web::Data<String>) -> HttpResponse {
    urlset(
        &base,
        &["/page/1", "/page/2", "/page/3", "/page/4", "/page/5", "/page/6"],
    )
}

async fn mixed_sitemap(base: web::Data<String>) -> HttpResponse {
    urlset(&base, &["/links", "/blocked", "/error", "/empty"])
}

/// Starts an in-process server on a random port and returns its base URL.
#[allow(dead_code)]
pub async fn start_test_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
    let addr = listener.local_addr().expect("No address bound");
    let base = format!("http://{}", addr);
    let data = web::Data::new(base.clone());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/links", web::get().to(links_page))
            .route("/slow", web::get().to(slow_page))
            .route("/page/{n}", web::get().to(numbered_page))
            .route("/empty", web::get().to(empty_page))
            .route("/check", web::get().to(check_page))
            .route(
                "/blocked",
                web::get().to(|| async { HttpResponse::Forbidden().body("Forbidden") }),
            )
            .route(
                "/error",
                web::route().to(|| async { HttpResponse::InternalServerError().body("Error") }),
            )
            .route(
                "/ok",
                web::route().to(|| async { HttpResponse::Ok().body("OK") }),
            )
            .route(
                "/not-found",
                web::route().to(|| async { HttpResponse::NotFound().body("Not Found") }),
            )
            .route("/sitemap.xml", web::get().to(root_sitemap))
            .route("/sitemap-index.xml", web::get().to(index_sitemap))
            .route("/sitemap-a.xml", web::get().to(sitemap_a))
            .route("/sitemap-b.xml", web::get().to(sitemap_b))
            .route(
                "/sitemap-broken.xml",
                web::get().to(|| async { html("<p>not xml</p>".to_string()) }),
            )
            .route("/sitemap-big.xml", web::get().to(big_sitemap))
            .route("/sitemap-pages.xml", web::get().to(pages_sitemap))
            .route("/sitemap-mixed.xml", web::get().to(mixed_sitemap))
            .route(
                "/sitemap-empty.xml",
                web::get().to(|| async {
                    xml(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"/>"#.into())
                }),
            )
            .route(
                "/not-a-sitemap",
                web::get().to(|| async { html("<a href=\"/\">Home</a>".to_string()) }),
            )
    })
    .workers(2)
    .listen(listener)
    .expect("Failed to listen on test server socket")
    .run();

    tokio::spawn(async move {
        if let Err(e) = server.await {
            eprintln!("Test server error: {}", e);
        }
    });

    base
}
