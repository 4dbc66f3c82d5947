//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to serve a small fake catalogue and run the
//! collector, extractor, builder and exporters end-to-end.

use book_harvest::config::{Config, HttpConfig, OutputConfig, SiteConfig};
use book_harvest::crawler::{build_http_client, collect_links};
use book_harvest::output::{CsvExporter, DatasetExporter};
use book_harvest::{HarvestError, Harvester, Rating};
use rusqlite::Connection;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, out_dir: &TempDir) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            start_page: "page-1.html".to_string(),
            max_pages: 10,
            currency_symbol: "£".to_string(),
        },
        http: HttpConfig {
            user_agent: "BookHarvestTest/1.0".to_string(),
            accept_language: "en-GB".to_string(),
            timeout_secs: 5,
        },
        output: OutputConfig {
            csv_path: out_dir
                .path()
                .join("dataset_books.csv")
                .to_string_lossy()
                .to_string(),
            database_path: out_dir.path().join("books.db").to_string_lossy().to_string(),
            table_name: "books".to_string(),
        },
    }
}

fn listing_page(links: &[&str], next: Option<&str>) -> String {
    let items: String = links
        .iter()
        .map(|href| {
            format!(
                r#"<li class="col-xs-6"><article class="product_pod">
                    <div class="image_container"><a href="{href}"><img src="x.jpg"></a></div>
                    <h3><a href="{href}" title="book">book</a></h3>
                </article></li>"#
            )
        })
        .collect();
    let next = next
        .map(|href| format!(r#"<li class="next"><a href="{href}">next</a></li>"#))
        .unwrap_or_default();

    format!(
        r#"<html><body><section>
            <ol class="row">{items}</ol>
            <div><ul class="pager"><li class="current">Page</li>{next}</ul></div>
        </section></body></html>"#
    )
}

fn detail_page(upc: &str, title: &str, price: &str, stars: &str) -> String {
    format!(
        r#"<html><body>
        <ul class="breadcrumb">
            <li><a href="../../index.html">Home</a></li>
            <li><a href="../category/books_1/index.html">Books</a></li>
            <li><a href="../category/books/travel_2/index.html">Travel</a></li>
            <li class="active">{title}</li>
        </ul>
        <article class="product_page"><div class="row">
            <div class="col-sm-6 product_main">
                <h1>{title}</h1>
                <p class="price_color">{price}</p>
                <p class="star-rating {stars}"><i class="icon-star"></i></p>
            </div>
        </div>
        <table class="table table-striped">
            <tr><th>UPC</th><td>{upc}</td></tr>
            <tr><th>Product Type</th><td>Books</td></tr>
            <tr><th>Price (excl. tax)</th><td>{price}</td></tr>
            <tr><th>Price (incl. tax)</th><td>{price}</td></tr>
            <tr><th>Tax</th><td>£0.00</td></tr>
            <tr><th>Availability</th><td>In stock (7 available)</td></tr>
            <tr><th>Number of reviews</th><td>0</td></tr>
        </table>
        </article></body></html>"#
    )
}

async fn mount_html(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Mounts a two-page catalogue with two books per page
async fn mount_catalogue(server: &MockServer) {
    mount_html(
        server,
        "/catalogue/page-1.html",
        200,
        listing_page(&["alpha_1/index.html", "beta_2/index.html"], Some("page-2.html")),
    )
    .await;
    mount_html(
        server,
        "/catalogue/page-2.html",
        200,
        listing_page(&["gamma_3/index.html", "delta_4/index.html"], None),
    )
    .await;

    for (slug, upc, title, price, stars) in [
        ("alpha_1", "upc-alpha", "Alpha", "£10.50", "One"),
        ("beta_2", "upc-beta", "Beta", "£20.00", "Three"),
        ("gamma_3", "upc-gamma", "Gamma", "£30.25", "Five"),
        ("delta_4", "upc-delta", "Delta", "£40.75", "Two"),
    ] {
        mount_html(
            server,
            &format!("/catalogue/{}/index.html", slug),
            200,
            detail_page(upc, title, price, stars),
        )
        .await;
    }
}

#[tokio::test]
async fn test_collect_links_across_pages() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;
    let out_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &out_dir);

    let client = build_http_client(&config.http).unwrap();
    let links = collect_links(&client, &config.site).await.unwrap();

    assert_eq!(
        links,
        vec![
            "alpha_1/index.html",
            "beta_2/index.html",
            "gamma_3/index.html",
            "delta_4/index.html"
        ]
    );
}

#[tokio::test]
async fn test_full_harvest_two_pages() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;
    let out_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &out_dir);
    let csv_path = config.output.csv_path.clone();
    let db_path = config.output.database_path.clone();

    let harvester = Harvester::new(config).expect("Failed to create harvester");
    let summary = harvester.run().await.expect("Harvest failed");

    assert_eq!(summary.listing_links, 4);
    assert_eq!(summary.rows, 4);
    assert_eq!(summary.fetch_failures, 0);
    assert_eq!(summary.extract_failures, 0);

    // CSV: header plus one row per book, in visit order
    let mut reader = csv::Reader::from_path(&csv_path).expect("CSV not written");
    assert_eq!(
        reader.headers().unwrap().iter().collect::<Vec<_>>(),
        vec![
            "upc",
            "title",
            "category",
            "product_type",
            "price_excl_tax",
            "price_incl_tax",
            "tax",
            "stock_text",
            "number_of_reviews",
            "rating"
        ]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    let upcs: Vec<&str> = rows.iter().map(|r| &r[0]).collect();
    assert_eq!(upcs, vec!["upc-alpha", "upc-beta", "upc-gamma", "upc-delta"]);
    assert_eq!(&rows[0][2], "Travel");
    assert_eq!(&rows[0][4], "10.5");
    assert_eq!(&rows[1][4], "20.0");
    assert_eq!(&rows[0][6], "0.00");
    assert_eq!(&rows[0][7], "7");
    assert_eq!(&rows[0][9], "1");
    assert_eq!(&rows[2][9], "5");

    // Database: same rows, same order
    let conn = Connection::open(&db_path).expect("Failed to open DB");
    let mut stmt = conn
        .prepare("SELECT upc, price_incl_tax, rating FROM books ORDER BY rowid")
        .unwrap();
    let found: Vec<(String, f64, i64)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(found.len(), 4);
    assert_eq!(found[3].0, "upc-delta");
    assert!((found[3].1 - 40.75).abs() < 1e-9);
    assert_eq!(found[1].2, 3);
}

#[tokio::test]
async fn test_failed_detail_fetch_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/catalogue/page-1.html",
        200,
        listing_page(&["alpha_1/index.html", "broken_9/index.html"], Some("page-2.html")),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/page-2.html",
        200,
        listing_page(&["gamma_3/index.html", "delta_4/index.html"], None),
    )
    .await;
    for (slug, upc) in [("alpha_1", "a"), ("gamma_3", "c"), ("delta_4", "d")] {
        mount_html(
            &mock_server,
            &format!("/catalogue/{}/index.html", slug),
            200,
            detail_page(upc, "Title", "£1.00", "Four"),
        )
        .await;
    }
    mount_html(
        &mock_server,
        "/catalogue/broken_9/index.html",
        500,
        "Internal Server Error".to_string(),
    )
    .await;

    let out_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &out_dir);
    let harvester = Harvester::with_exporters(config, vec![]).unwrap();
    let (dataset, summary) = harvester.scrape().await.expect("Harvest should not fail");

    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.index().collect::<Vec<_>>(), vec!["a", "c", "d"]);
    assert_eq!(summary.listing_links, 4);
    assert_eq!(summary.fetch_failures, 1);
}

#[tokio::test]
async fn test_incomplete_detail_page_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/catalogue/page-1.html",
        200,
        listing_page(&["alpha_1/index.html", "bare_2/index.html"], None),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/alpha_1/index.html",
        200,
        detail_page("a", "Alpha", "£1.00", "Two"),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/bare_2/index.html",
        200,
        "<html><body><div class=\"product_main\"><h1>Bare</h1></div></body></html>".to_string(),
    )
    .await;

    let out_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &out_dir);
    let harvester = Harvester::with_exporters(config, vec![]).unwrap();
    let (dataset, summary) = harvester.scrape().await.unwrap();

    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.rows[0].rating, Rating::Stars(2));
    assert_eq!(summary.extract_failures, 1);
}

#[tokio::test]
async fn test_failed_first_listing_page_yields_empty_dataset() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/catalogue/page-1.html",
        404,
        "Not Found".to_string(),
    )
    .await;

    let out_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &out_dir);
    let csv_path = config.output.csv_path.clone();
    let summary = Harvester::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.listing_links, 0);
    assert_eq!(summary.rows, 0);

    let text = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(text.lines().count(), 1);
}

#[tokio::test]
async fn test_failed_later_listing_page_keeps_earlier_links() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/catalogue/page-1.html",
        200,
        listing_page(&["alpha_1/index.html", "beta_2/index.html"], Some("page-2.html")),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/page-2.html",
        500,
        "Internal Server Error".to_string(),
    )
    .await;

    let out_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &out_dir);
    let client = build_http_client(&config.http).unwrap();
    let links = collect_links(&client, &config.site)
        .await
        .expect("A failed listing page should end the crawl, not fail it");

    assert_eq!(links, vec!["alpha_1/index.html", "beta_2/index.html"]);
}

#[tokio::test]
async fn test_page_limit_is_reported() {
    let mock_server = MockServer::start().await;
    for i in 1..=3 {
        mount_html(
            &mock_server,
            &format!("/catalogue/page-{}.html", i),
            200,
            listing_page(&[], Some(&format!("page-{}.html", i + 1))),
        )
        .await;
    }

    let out_dir = TempDir::new().unwrap();
    let mut config = create_test_config(&mock_server.uri(), &out_dir);
    config.site.max_pages = 2;

    let client = build_http_client(&config.http).unwrap();
    let err = collect_links(&client, &config.site).await.unwrap_err();
    assert!(matches!(err, HarvestError::PageLimitExceeded { max_pages: 2 }));
}

#[tokio::test]
async fn test_self_referencing_pager_is_reported() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/catalogue/page-1.html",
        200,
        listing_page(&["alpha_1/index.html"], Some("page-1.html")),
    )
    .await;

    let out_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &out_dir);
    let client = build_http_client(&config.http).unwrap();
    let err = collect_links(&client, &config.site).await.unwrap_err();

    assert!(matches!(err, HarvestError::PaginationLoop { .. }));
}

#[tokio::test]
async fn test_missing_pager_aborts_without_output() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/catalogue/page-1.html",
        200,
        r#"<ol class="row"><li><h3><a href="alpha_1/index.html">A</a></h3></li></ol>"#.to_string(),
    )
    .await;

    let out_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &out_dir);
    let csv_path = config.output.csv_path.clone();
    let err = Harvester::new(config).unwrap().run().await.unwrap_err();

    assert!(matches!(err, HarvestError::HtmlParse { .. }));
    assert!(!std::path::Path::new(&csv_path).exists());
}

#[tokio::test]
async fn test_bad_price_aborts_before_export() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/catalogue/page-1.html",
        200,
        listing_page(&["alpha_1/index.html"], None),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/alpha_1/index.html",
        200,
        detail_page("a", "Alpha", "£free", "One"),
    )
    .await;

    let out_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &out_dir);
    let csv_path = config.output.csv_path.clone();
    let exporters: Vec<Box<dyn DatasetExporter>> = vec![Box::new(CsvExporter::new(&csv_path))];
    let err = Harvester::with_exporters(config, exporters)
        .unwrap()
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::Build(_)));
    assert!(!std::path::Path::new(&csv_path).exists());
}

#[tokio::test]
async fn test_requests_carry_configured_headers() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalogue/page-1.html"))
        .and(header("user-agent", "BookHarvestTest/1.0"))
        .and(header("accept-language", "en-GB"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&["alpha_1/index.html"], None))
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let out_dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &out_dir);
    let client = build_http_client(&config.http).unwrap();

    // Without the headers the mock answers 404 and no link is collected
    let links = collect_links(&client, &config.site).await.unwrap();
    assert_eq!(links, vec!["alpha_1/index.html"]);
}
