/// Placeholder the report uses for "not available".
pub const MISSING_PLACEHOLDER: char = '-';

/// Outcome of cleaning a single year cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CleanedWage {
    Value(f64),
    Missing,
}

impl CleanedWage {
    /// Returns the wage only when it can be recorded as an observation.
    pub fn usable(self) -> Option<f64> {
        match self {
            CleanedWage::Value(value) if value.is_finite() && value > 0.0 => Some(value),
            _ => None,
        }
    }
}

/// Strips every placeholder dash and parses the remainder.
///
/// Empty cells and anything that does not parse as a number come back as
/// [`CleanedWage::Missing`], never as zero.
pub fn clean_wage_cell(raw: &str) -> CleanedWage {
    let stripped: String = raw.chars().filter(|c| *c != MISSING_PLACEHOLDER).collect();
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return CleanedWage::Missing;
    }

    match trimmed.parse::<f64>() {
        Ok(parsed) if !parsed.is_nan() => CleanedWage::Value(parsed),
        _ => CleanedWage::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_dash_is_missing() {
        assert_eq!(clean_wage_cell("-"), CleanedWage::Missing);
        assert_eq!(clean_wage_cell(" - "), CleanedWage::Missing);
        assert_eq!(clean_wage_cell(""), CleanedWage::Missing);
    }

    #[test]
    fn numeric_cells_parse() {
        assert_eq!(clean_wage_cell("1250"), CleanedWage::Value(1250.0));
        assert_eq!(clean_wage_cell(" 987.5 "), CleanedWage::Value(987.5));
    }

    #[test]
    fn garbage_is_missing_not_zero() {
        assert_eq!(clean_wage_cell("n.a."), CleanedWage::Missing);
        assert_eq!(clean_wage_cell("1,250"), CleanedWage::Missing);
        assert_eq!(clean_wage_cell("nan"), CleanedWage::Missing);
    }

    #[test]
    fn usable_rejects_zero_and_infinite() {
        assert_eq!(CleanedWage::Value(0.0).usable(), None);
        assert_eq!(CleanedWage::Value(f64::INFINITY).usable(), None);
        assert_eq!(CleanedWage::Missing.usable(), None);
        assert_eq!(CleanedWage::Value(420.0).usable(), Some(420.0));
    }

    #[test]
    fn every_dash_is_removed_before_parsing() {
        // A leading dash is treated as a placeholder, not a sign.
        assert_eq!(clean_wage_cell("-500"), CleanedWage::Value(500.0));
    }
}
