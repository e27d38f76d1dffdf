// src/config/consts.rs

// Sources
pub const URL_PROPSTREAM_LOGIN: &str = "https://login.propstream.com/";
pub const URL_COMPASS: &str = "https://www.compass.com/";
pub const URL_GOOGLE: &str = "https://www.google.com/";

// Config
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

// Timeouts (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 20;

// WebDriver
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

// Underwriting defaults
pub const DEFAULT_FEE: i64 = 15_000;
pub const DEFAULT_BUYER_CREDIT: i64 = 0;
pub const DEFAULT_WHOLESALE_DISCOUNT_PCT: i64 = 80;
pub const DEFAULT_TIER_RATES: &[(&str, i64)] = &[
    ("Tier 1", 30),
    ("Tier 1.5", 45),
    ("Tier 2", 60),
    ("Tier 2.5", 75),
    ("Tier 3", 90),
    ("Tier 3.5", 105),
];
pub const DEFAULT_AGE_TIER_LABEL: &str = "Old house";
pub const DEFAULT_AGE_THRESHOLD_YEAR: i64 = 1925;
pub const DEFAULT_AGE_TIER_RATE: i64 = 120;
pub const DEFAULT_QUICK_CHECK: &[(&str, i64)] = &[("70% of avg sale", 70)];

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE_STEM: &str = "property";
pub const REPORT_EXT: &str = "txt";
