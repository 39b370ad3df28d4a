pub mod classifier;
pub mod cleaner;
pub mod errors;
pub mod layout;
pub mod model;
mod reshape;

pub use classifier::{classify_label, ClassifierState, LeafAttributes, LeafJob, RowKind};
pub use cleaner::{clean_wage_cell, CleanedWage};
pub use errors::ParserError;
pub use layout::ReportLayout;
pub use model::{Gender, ParseStats, RawRow, WageObservation, WageTable, WAGE_COLUMNS};
pub use reshape::{parse_wage_report, parse_wage_report_bytes, reshape_rows};
