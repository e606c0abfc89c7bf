use serde::{Deserialize, Serialize};

// ==============================================================================
// Month Name Localization
// ==============================================================================

const GERMAN_MONTHS: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni",
    "Juli", "August", "September", "Oktober", "November", "Dezember",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Display names for calendar months 1-12.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthNames {
    names: [String; 12],
}

impl MonthNames {
    pub fn new(names: [String; 12]) -> Self {
        Self { names }
    }

    pub fn german() -> Self {
        Self::from_static(GERMAN_MONTHS)
    }

    pub fn english() -> Self {
        Self::from_static(ENGLISH_MONTHS)
    }

    /// Look up a built-in table by locale code ("de", "en", "de-DE", ...).
    pub fn from_locale(locale: &str) -> Option<Self> {
        let lang = locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();

        match lang.as_str() {
            "de" => Some(Self::german()),
            "en" => Some(Self::english()),
            _ => None,
        }
    }

    /// Name for `month` (1 = January). Out-of-range months yield an empty str.
    pub fn name(&self, month: u32) -> &str {
        month
            .checked_sub(1)
            .and_then(|idx| self.names.get(idx as usize))
            .map(String::as_str)
            .unwrap_or_default()
    }

    fn from_static(names: [&str; 12]) -> Self {
        Self {
            names: names.map(|name| name.to_string()),
        }
    }
}

impl Default for MonthNames {
    fn default() -> Self {
        Self::german()
    }
}

// ==============================================================================
// Lookback Windows
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookbackWindow {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "15y")]
    FifteenYears,
}

impl LookbackWindow {
    pub const ALL_WINDOWS: [LookbackWindow; 4] = [
        LookbackWindow::All,
        LookbackWindow::FiveYears,
        LookbackWindow::TenYears,
        LookbackWindow::FifteenYears,
    ];

    pub fn years(&self) -> Option<u32> {
        match self {
            LookbackWindow::All => None,
            LookbackWindow::FiveYears => Some(5),
            LookbackWindow::TenYears => Some(10),
            LookbackWindow::FifteenYears => Some(15),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            LookbackWindow::All => "all",
            LookbackWindow::FiveYears => "5y",
            LookbackWindow::TenYears => "10y",
            LookbackWindow::FifteenYears => "15y",
        }
    }
}

impl std::fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ==============================================================================
// Seasonality Output
// ==============================================================================

/// Return statistics for one calendar month across all years in a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityRow {
    pub month: u32,
    pub month_name: String,
    pub avg_return: f64,
    pub median_return: f64,
    /// Sample standard deviation; `None` with fewer than two observations.
    pub std_dev: Option<f64>,
    pub positive_count: usize,
    pub negative_count: usize,
    pub total_count: usize,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeasonalityReport {
    pub all: Vec<SeasonalityRow>,
    #[serde(rename = "5y")]
    pub five_years: Vec<SeasonalityRow>,
    #[serde(rename = "10y")]
    pub ten_years: Vec<SeasonalityRow>,
    #[serde(rename = "15y")]
    pub fifteen_years: Vec<SeasonalityRow>,
}

impl SeasonalityReport {
    pub fn window(&self, window: LookbackWindow) -> &[SeasonalityRow] {
        match window {
            LookbackWindow::All => &self.all,
            LookbackWindow::FiveYears => &self.five_years,
            LookbackWindow::TenYears => &self.ten_years,
            LookbackWindow::FifteenYears => &self.fifteen_years,
        }
    }

    pub fn set_window(&mut self, window: LookbackWindow, rows: Vec<SeasonalityRow>) {
        match window {
            LookbackWindow::All => self.all = rows,
            LookbackWindow::FiveYears => self.five_years = rows,
            LookbackWindow::TenYears => self.ten_years = rows,
            LookbackWindow::FifteenYears => self.fifteen_years = rows,
        }
    }
}
