use ethers_core::types::U256;
use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::errors::{AirdropError, Result};
use crate::types::has_address_shape;

pub const DEFAULT_API_HOST: &str = "https://api-cypress.scope.klaytn.com";
pub const DEFAULT_TOKEN: &str = "0x9cfc059f64d664f92f3d0329844b8ccca4e5215b";
pub const DEFAULT_NFT_TOKEN: &str = "0x67c11ff997c0ec018bcc107c5be52b515504d663";

/// Airdrop pool and treasury addresses, never part of a distribution.
pub const DEFAULT_SKIP_LIST: &[&str] = &[
    "0x9CFc059F64D664F92f3d0329844B8ccca4E5215B",
    "0x1dA9E7adfB6817D42b1c9a5321992B1EF97701Ab",
    "0x7D197D87Aa79E27bcdc3a62f819329deC6F81Ec2",
];

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// `None` retries a page until it succeeds.
    pub max_attempts: Option<u32>,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: Some(10),
            backoff_base: Duration::from_millis(250),
            backoff_max: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CampaignConfig {
    // Explorer
    pub api_host: String,
    pub token: String,
    pub total_pages: u32,
    pub page_size: Option<usize>,
    pub max_in_flight: Option<usize>,
    pub request_timeout: Duration,
    pub retry: RetryConfig,

    // Allocation
    pub deduction: U256,
    pub scale_numerator: U256,
    pub scale_denominator: U256,
    pub skip_list: Vec<String>,
    pub exclusion_path: Option<PathBuf>,
    pub case_insensitive: bool,

    // Output
    pub output_dir: PathBuf,
    pub report_path: Option<PathBuf>,
    pub batch_size: usize,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            token: DEFAULT_TOKEN.to_string(),
            total_pages: 220,
            page_size: None,
            max_in_flight: None,
            request_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),

            deduction: U256::from(1_000_000_000_000u64),
            scale_numerator: U256::from(8),
            scale_denominator: U256::from(10),
            skip_list: DEFAULT_SKIP_LIST.iter().map(|s| s.to_string()).collect(),
            exclusion_path: Some(PathBuf::from("addresses.json")),
            case_insensitive: false,

            output_dir: PathBuf::from("parameters"),
            report_path: Some(PathBuf::from("allocations.csv")),
            batch_size: 500,
        }
    }
}

impl CampaignConfig {
    /// Defaults overridden by `AIRDROP_*` variables, `.env` included.
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env()
    }

    /// Holder snapshot of the NFT collection; no allocation involved.
    pub fn nft_defaults() -> Self {
        Self {
            token: DEFAULT_NFT_TOKEN.to_string(),
            total_pages: 5,
            exclusion_path: None,
            report_path: None,
            ..Self::default()
        }
    }

    pub fn apply_env(self) -> Result<Self> {
        dotenv::dotenv().ok();
        let mut config = self;

        if let Some(host) = var("AIRDROP_API_HOST") {
            config.api_host = host;
        }
        if let Some(token) = var("AIRDROP_TOKEN") {
            config.token = token;
        }
        if let Some(pages) = parsed("AIRDROP_TOTAL_PAGES")? {
            config.total_pages = pages;
        }
        config.page_size = parsed("AIRDROP_PAGE_SIZE")?.or(config.page_size);
        config.max_in_flight = parsed("AIRDROP_MAX_IN_FLIGHT")?.or(config.max_in_flight);
        if let Some(secs) = parsed::<u64>("AIRDROP_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = parsed::<u32>("AIRDROP_MAX_ATTEMPTS")? {
            // 0 keeps retrying forever
            config.retry.max_attempts = (attempts > 0).then_some(attempts);
        }
        if let Some(ms) = parsed::<u64>("AIRDROP_BACKOFF_MS")? {
            config.retry.backoff_base = Duration::from_millis(ms);
        }

        if let Some(deduction) = var("AIRDROP_DEDUCTION") {
            config.deduction = parse_u256("AIRDROP_DEDUCTION", &deduction)?;
        }
        if let Some(n) = var("AIRDROP_SCALE_NUMERATOR") {
            config.scale_numerator = parse_u256("AIRDROP_SCALE_NUMERATOR", &n)?;
        }
        if let Some(d) = var("AIRDROP_SCALE_DENOMINATOR") {
            config.scale_denominator = parse_u256("AIRDROP_SCALE_DENOMINATOR", &d)?;
        }
        if let Some(list) = var("AIRDROP_SKIP_LIST") {
            config.skip_list = list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(raw) = var("AIRDROP_EXCLUSION_PATH") {
            config.exclusion_path = exclusion_path(&raw);
        }
        if let Some(flag) = parsed::<bool>("AIRDROP_CASE_INSENSITIVE")? {
            config.case_insensitive = flag;
        }

        if let Some(dir) = var("AIRDROP_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(path) = var("AIRDROP_REPORT_PATH") {
            config.report_path = Some(PathBuf::from(path));
        }
        if let Some(size) = parsed("AIRDROP_BATCH_SIZE")? {
            config.batch_size = size;
        }

        Ok(config)
    }

    pub fn validate_all(&self) -> Result<()> {
        validate_api_host(&self.api_host)?;
        validate_token(&self.token)?;

        if self.total_pages == 0 {
            return Err(AirdropError::Config("total_pages must be at least 1".into()));
        }
        if self.max_in_flight == Some(0) {
            return Err(AirdropError::Config("max_in_flight must be at least 1".into()));
        }
        if self.scale_denominator.is_zero() {
            return Err(AirdropError::Config("scale denominator cannot be zero".into()));
        }
        if self.batch_size == 0 {
            return Err(AirdropError::Config("batch_size must be at least 1".into()));
        }
        for address in &self.skip_list {
            if !has_address_shape(address) {
                return Err(AirdropError::Config(format!(
                    "invalid skip list address: {}",
                    address
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct WinnerConfig {
    pub input_path: PathBuf,
    pub main_count: usize,
    pub backup_count: usize,
}

impl Default for WinnerConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("addresses.txt"),
            main_count: 10,
            backup_count: 5,
        }
    }
}

impl WinnerConfig {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        let mut config = Self::default();

        if let Some(path) = var("WINNER_INPUT_PATH") {
            config.input_path = PathBuf::from(path);
        }
        if let Some(count) = parsed("WINNER_MAIN_COUNT")? {
            config.main_count = count;
        }
        if let Some(count) = parsed("WINNER_BACKUP_COUNT")? {
            config.backup_count = count;
        }

        Ok(config)
    }
}

/// Input/output file of a one-off run, overridable through `key`.
pub fn path_from_env(key: &str, default: &str) -> PathBuf {
    dotenv::dotenv().ok();
    PathBuf::from(var(key).unwrap_or_else(|| default.to_string()))
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AirdropError::Config(format!("{}={}: {}", key, raw, e))),
        None => Ok(None),
    }
}

/// `none` runs without an exclusion list.
fn exclusion_path(raw: &str) -> Option<PathBuf> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(PathBuf::from(raw))
    }
}

fn parse_u256(key: &str, raw: &str) -> Result<U256> {
    U256::from_dec_str(raw.trim())
        .map_err(|e| AirdropError::Config(format!("{}={}: {}", key, raw, e)))
}

fn validate_api_host(host: &str) -> Result<()> {
    if !host.starts_with("http://") && !host.starts_with("https://") {
        return Err(AirdropError::Config(format!("invalid api host: {}", host)));
    }
    Ok(())
}

fn validate_token(token: &str) -> Result<()> {
    if !has_address_shape(token) || !token[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AirdropError::Config(format!("invalid token contract: {}", token)));
    }
    Ok(())
}
