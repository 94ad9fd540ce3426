use serde::Deserialize;

/// Main configuration structure for Course-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub target: TargetConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub sections: SectionConfig,
}

impl Config {
    /// Creates a configuration for the given target with all defaults
    pub fn for_target(target: TargetConfig) -> Self {
        Self {
            target,
            fetch: FetchConfig::default(),
            browser: BrowserConfig::default(),
            output: OutputConfig::default(),
            sections: SectionConfig::default(),
        }
    }
}

/// The four inputs of a scrape run
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TargetConfig {
    /// Listing page to scrape
    pub url: String,

    /// Prefix for hrefs that start with `/`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Substring identifying course anchors
    #[serde(rename = "link-keyword")]
    pub link_keyword: String,

    /// File name of the record file inside the data directory
    #[serde(rename = "output-name")]
    pub output_name: String,
}

/// HTTP fetching behavior
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header sent with every plain GET
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for the listing page GET (seconds)
    #[serde(rename = "static-timeout-secs", default = "default_static_timeout")]
    pub static_timeout_secs: u64,

    /// Timeout for each course page GET (seconds)
    #[serde(rename = "detail-timeout-secs", default = "default_detail_timeout")]
    pub detail_timeout_secs: u64,

    /// Timeout for the rendered fetch wait (seconds)
    #[serde(rename = "render-timeout-secs", default = "default_render_timeout")]
    pub render_timeout_secs: u64,

    /// Delay between consecutive course page requests (milliseconds)
    #[serde(rename = "polite-delay-ms", default = "default_polite_delay")]
    pub polite_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            static_timeout_secs: default_static_timeout(),
            detail_timeout_secs: default_detail_timeout(),
            render_timeout_secs: default_render_timeout(),
            polite_delay_ms: default_polite_delay(),
        }
    }
}

/// Headless browser settings for the rendered fetch
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// WebDriver endpoint (e.g. a running chromedriver)
    #[serde(rename = "webdriver-url", default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Window size as "WIDTH,HEIGHT"
    #[serde(rename = "window-size", default = "default_window_size")]
    pub window_size: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            window_size: default_window_size(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the record file is written into
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Patterns locating detail sections on course pages
#[derive(Debug, Clone, Deserialize)]
pub struct SectionConfig {
    /// Element name searched for (matched by its `id`)
    #[serde(default = "default_section_element")]
    pub element: String,

    #[serde(rename = "eligibility-pattern", default = "default_eligibility_pattern")]
    pub eligibility_pattern: String,

    #[serde(rename = "fees-pattern", default = "default_fees_pattern")]
    pub fees_pattern: String,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            element: default_section_element(),
            eligibility_pattern: default_eligibility_pattern(),
            fees_pattern: default_fees_pattern(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_static_timeout() -> u64 {
    12
}

fn default_detail_timeout() -> u64 {
    10
}

fn default_render_timeout() -> u64 {
    25
}

fn default_polite_delay() -> u64 {
    1000
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_window_size() -> String {
    "1920,1080".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_section_element() -> String {
    "section".to_string()
}

fn default_eligibility_pattern() -> String {
    "entry|requirement".to_string()
}

fn default_fees_pattern() -> String {
    "fee".to_string()
}
