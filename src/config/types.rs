use serde::Deserialize;

/// Main configuration structure for Book-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Catalogue location and crawl bounds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Root URL of the site; listing and detail pages live under `catalogue/`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// First listing page, relative to the catalogue
    #[serde(rename = "start-page")]
    pub start_page: String,

    /// Maximum number of listing pages fetched before the crawl is aborted
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Currency prefix stripped from price and tax cells
    #[serde(rename = "currency-symbol")]
    pub currency_symbol: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://books.toscrape.com/".to_string(),
            start_page: "page-1.html".to_string(),
            max_pages: 1000,
            currency_symbol: "£".to_string(),
        }
    }
}

/// Request headers and client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Value of the `User-Agent` header
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Value of the `Accept-Language` header
    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "en-US, en;q=0.5".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the CSV file
    #[serde(rename = "csv-path")]
    pub csv_path: String,

    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Table replaced on every run
    #[serde(rename = "table-name")]
    pub table_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "dataset_books.csv".to_string(),
            database_path: "books.db".to_string(),
            table_name: "books".to_string(),
        }
    }
}
