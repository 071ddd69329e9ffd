use crate::error::{ProjectionError, Result};

pub const MONTHS_PER_YEAR: u32 = 12;

pub fn validate_month(month: u32) -> Result<()> {
    if !(1..=MONTHS_PER_YEAR).contains(&month) {
        return Err(ProjectionError::InvalidMonth(month));
    }
    Ok(())
}

pub fn months_remaining(current_month: u32) -> Result<u32> {
    validate_month(current_month)?;
    Ok(MONTHS_PER_YEAR - current_month)
}

/// Returns the calendar months still to be projected, ascending.
/// The current partial month is excluded; `months_remaining == 0` yields
/// an empty window.
pub fn projected_months(months_remaining: u32) -> Result<Vec<u32>> {
    if months_remaining >= MONTHS_PER_YEAR {
        return Err(ProjectionError::InvalidMonthsRemaining(months_remaining));
    }
    let first = MONTHS_PER_YEAR - months_remaining + 1;
    Ok((first..=MONTHS_PER_YEAR).collect())
}

/// Coerces a currency cell to a number. Strips "$", thousands separators and
/// surrounding whitespace; blank or unparseable cells become 0.0.
pub fn clean_currency(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();

    if cleaned.is_empty() {
        return 0.0;
    }

    cleaned.parse::<f64>().unwrap_or(0.0)
}

pub fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
