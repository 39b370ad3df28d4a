//! Row classification for the province → sector → job hierarchy.
//!
//! The report has no key columns. A row's place in the hierarchy comes only from its
//! label and from the header rows that came before it. [`classify_label`] turns a label
//! into a [`RowKind`] using an ordered rule list. [`ClassifierState::advance`] applies that
//! kind to the running state and returns the attributes of a leaf row.

use tracing::debug;

use crate::cleaner::CleanedWage;
use crate::layout::{
    ReportLayout, ALL_ISLAND, FEMALE_MARKER, FEMALE_SUFFIX, MALE_MARKER, MALE_SUFFIX,
    PROVINCE_KEYWORD, SECTOR_KEYWORD,
};
use crate::model::{Gender, WageObservation};

/// Where a gendered leaf row takes its job category from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafJob {
    /// The most recent job marker.
    Current,
    /// The job named in the row label itself.
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Blank,
    ProvinceHeader(String),
    SectorHeader(String),
    JobMarker(String),
    GenderedLeaf { gender: Gender, job: LeafJob },
    PlainLeaf(String),
}

impl RowKind {
    pub fn is_header(&self) -> bool {
        matches!(
            self,
            RowKind::ProvinceHeader(_) | RowKind::SectorHeader(_) | RowKind::JobMarker(_)
        )
    }
}

type Rule = fn(&str, &ReportLayout) -> Option<RowKind>;

/// Classification rules in precedence order. The first rule that matches wins.
const RULES: [(&str, Rule); 6] = [
    ("blank", blank_rule),
    ("province_header", province_rule),
    ("sector_header", sector_rule),
    ("job_marker", job_marker_rule),
    ("gendered_leaf", gendered_leaf_rule),
    ("plain_leaf", plain_leaf_rule),
];

/// Names of the classification rules in the order they are evaluated.
pub fn rule_names() -> impl Iterator<Item = &'static str> {
    RULES.iter().map(|(name, _)| *name)
}

pub fn classify_label(label: &str, layout: &ReportLayout) -> RowKind {
    let label = label.trim();
    RULES
        .iter()
        .find_map(|(_, rule)| rule(label, layout))
        .unwrap_or_else(|| RowKind::PlainLeaf(label.to_string()))
}

fn blank_rule(label: &str, layout: &ReportLayout) -> Option<RowKind> {
    (label.is_empty() || layout.is_null_marker(label)).then_some(RowKind::Blank)
}

fn province_rule(label: &str, layout: &ReportLayout) -> Option<RowKind> {
    if label == layout.all_island_label {
        return Some(RowKind::ProvinceHeader(ALL_ISLAND.to_string()));
    }
    label
        .contains(PROVINCE_KEYWORD)
        .then(|| RowKind::ProvinceHeader(label.replace(PROVINCE_KEYWORD, "").trim().to_string()))
}

fn sector_rule(label: &str, _layout: &ReportLayout) -> Option<RowKind> {
    label
        .contains(SECTOR_KEYWORD)
        .then(|| RowKind::SectorHeader(label.replace(SECTOR_KEYWORD, "").trim().to_string()))
}

fn job_marker_rule(label: &str, layout: &ReportLayout) -> Option<RowKind> {
    layout
        .is_job_marker(label)
        .then(|| RowKind::JobMarker(label.to_string()))
}

fn gendered_leaf_rule(label: &str, layout: &ReportLayout) -> Option<RowKind> {
    if layout.is_male_token(label) {
        return Some(RowKind::GenderedLeaf {
            gender: Gender::Male,
            job: LeafJob::Current,
        });
    }
    if layout.is_female_token(label) {
        return Some(RowKind::GenderedLeaf {
            gender: Gender::Female,
            job: LeafJob::Current,
        });
    }

    // "Male" is checked first; "Female" does not contain it case-sensitively.
    let (gender, suffix) = if label.contains(MALE_MARKER) {
        (Gender::Male, MALE_SUFFIX)
    } else if label.contains(FEMALE_MARKER) {
        (Gender::Female, FEMALE_SUFFIX)
    } else {
        return None;
    };

    Some(RowKind::GenderedLeaf {
        gender,
        job: LeafJob::Named(label.replace(suffix, "").trim().to_string()),
    })
}

fn plain_leaf_rule(label: &str, _layout: &ReportLayout) -> Option<RowKind> {
    Some(RowKind::PlainLeaf(label.to_string()))
}

/// Hierarchy context in effect for a leaf row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafAttributes {
    pub province: String,
    pub sector: String,
    pub job_category: String,
    pub gender: Gender,
}

impl LeafAttributes {
    /// Pairs the leaf with each year column and keeps the cells holding a usable wage.
    ///
    /// Leaves seen before any province header carry an empty province and emit nothing.
    pub fn observations(&self, years: &[i32], cells: &[CleanedWage]) -> Vec<WageObservation> {
        if self.province.is_empty() {
            return Vec::new();
        }

        years
            .iter()
            .zip(cells.iter())
            .filter_map(|(year, cell)| {
                cell.usable().map(|daily_wage| WageObservation {
                    province: self.province.clone(),
                    sector: self.sector.clone(),
                    job_category: self.job_category.clone(),
                    gender: self.gender,
                    year: *year,
                    daily_wage,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifierState {
    pub current_province: String,
    pub current_sector: String,
    pub current_job: String,
}

impl ClassifierState {
    /// Applies one classified row. Header kinds update the state and return `None`;
    /// leaf kinds leave the state as is and return the attributes to emit with.
    pub fn advance(self, kind: RowKind) -> (Self, Option<LeafAttributes>) {
        match kind {
            RowKind::Blank => (self, None),
            RowKind::ProvinceHeader(province) => {
                debug!(province = %province, "province header");
                (
                    Self {
                        current_province: province,
                        ..self
                    },
                    None,
                )
            }
            RowKind::SectorHeader(sector) => {
                debug!(sector = %sector, "sector header");
                (
                    Self {
                        current_sector: sector,
                        ..self
                    },
                    None,
                )
            }
            RowKind::JobMarker(job) => {
                debug!(job = %job, "job marker");
                (
                    Self {
                        current_job: job,
                        ..self
                    },
                    None,
                )
            }
            RowKind::GenderedLeaf { gender, job } => {
                let job_category = match job {
                    LeafJob::Current => self.current_job.clone(),
                    LeafJob::Named(name) => name,
                };
                let attributes = self.leaf(job_category, gender);
                (self, Some(attributes))
            }
            RowKind::PlainLeaf(label) => {
                let attributes = self.leaf(label, Gender::Male);
                (self, Some(attributes))
            }
        }
    }

    fn leaf(&self, job_category: String, gender: Gender) -> LeafAttributes {
        LeafAttributes {
            province: self.current_province.clone(),
            sector: self.current_sector.clone(),
            job_category,
            gender,
        }
    }
}
