//! Central place for all default values.
//! Update these and the whole app picks them up.

pub struct Defaults;

impl Defaults {

    /* Directories */
    pub const INPUT_DIR: &'static str = "./data-in";
    pub const OUTPUT_DIR: &'static str = "./data-out";
    pub const RETURNS_FILE: &'static str = "monthly-returns.tsv";

    /* Menu rendering */
    pub const PROMPT: &'static str = "Choose option: ";
    pub const BREADCRUMB_SEP: &'static str = " >> ";
    pub const EXIT_KEY: &'static str = "0";
    pub const FIRST_KEY: i64 = 1;

    /* Yahoo Finance */
    pub const YAHOO_CHART_URL: &'static str = "https://query1.finance.yahoo.com/v8/finance/chart";
    pub const USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
    pub const HTTP_TIMEOUT_SECS: u64 = 30;

    /* Logging */
    pub const LOG_FILTER: &'static str = "warn";
}
