use serde::{Deserialize, Serialize};

/// Keyword marking a province header row; removed from the label to get the province name.
pub const PROVINCE_KEYWORD: &str = "Province";
/// Keyword marking a sector header row; removed from the label to get the sector name.
pub const SECTOR_KEYWORD: &str = "Sector";
/// Province value recorded for rows under the full-country sentinel header.
pub const ALL_ISLAND: &str = "All Island";

pub const MALE_MARKER: &str = "Male";
pub const FEMALE_MARKER: &str = "Female";
pub const MALE_SUFFIX: &str = "- Male";
pub const FEMALE_SUFFIX: &str = "- Female";

/// Labels a CSV reader conventionally loads as missing. Rows carrying one are skipped.
pub const NA_LABELS: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

/// Vocabulary of the fixed report layout.
///
/// The defaults describe the published informal-sector wage report. Every field can be
/// overridden from the `[layout]` table of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLayout {
    /// Label of the full-country aggregate header.
    pub all_island_label: String,
    /// Closed set of labels that name a job without carrying wages themselves.
    pub job_markers: Vec<String>,
    /// Exact labels that mark a male row under the current job.
    pub male_tokens: Vec<String>,
    /// Exact labels that mark a female row under the current job.
    pub female_tokens: Vec<String>,
    /// Labels treated as empty, compared case-insensitively.
    pub null_markers: Vec<String>,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            all_island_label: "All Island (d )".to_string(),
            job_markers: ["Tea", "Rubber", "Coconut", "Paddy", "Carpentry", "Masonry"]
                .into_iter()
                .map(String::from)
                .collect(),
            male_tokens: vec!["Male".to_string()],
            female_tokens: vec!["Femal".to_string()],
            null_markers: NA_LABELS.iter().map(|label| label.to_string()).collect(),
        }
    }
}

impl ReportLayout {
    pub fn is_null_marker(&self, label: &str) -> bool {
        self.null_markers
            .iter()
            .any(|marker| marker.eq_ignore_ascii_case(label))
    }

    pub fn is_job_marker(&self, label: &str) -> bool {
        self.job_markers.iter().any(|job| job == label)
    }

    pub fn is_male_token(&self, label: &str) -> bool {
        self.male_tokens.iter().any(|token| token == label)
    }

    pub fn is_female_token(&self, label: &str) -> bool {
        self.female_tokens.iter().any(|token| token == label)
    }
}
