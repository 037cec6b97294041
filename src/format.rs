use time::macros::format_description;
use time::Date;

use crate::error::FormatError;

/// Month abbreviations as shown in the bills table, indexed by month - 1.
/// Juin and juillet both truncate to "Jui".
const MONTHS_ABBR: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// Display formatting used by the list view, injectable so controllers can
/// be tested against counting/identity doubles.
pub trait Formatter: Send + Sync {
    fn format_date(&self, raw: &str) -> Result<String, FormatError>;
    fn format_status(&self, raw: &str) -> String;
}

/// Default formatter backed by the free functions below.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleFormatter;

impl Formatter for LocaleFormatter {
    fn format_date(&self, raw: &str) -> Result<String, FormatError> {
        format_date(raw)
    }

    fn format_status(&self, raw: &str) -> String {
        format_status(raw)
    }
}

/// Render a raw `YYYY-MM-DD` date as the display form, e.g. "4 Avr. 04".
/// Unparseable input is a hard error; the list controller decides whether to
/// fall back to the raw value.
pub fn format_date(raw: &str) -> Result<String, FormatError> {
    let format = format_description!("[year]-[month]-[day]");
    let date = Date::parse(raw.trim(), &format).map_err(|_| FormatError::BadDate {
        raw: raw.to_string(),
    })?;
    let month = MONTHS_ABBR[usize::from(u8::from(date.month())) - 1];
    Ok(format!(
        "{} {}. {:02}",
        date.day(),
        month,
        date.year().rem_euclid(100)
    ))
}

/// Map a workflow status to its display label. Values outside the known set
/// get their first letter capitalized and are otherwise passed through.
pub fn format_status(raw: &str) -> String {
    match raw {
        "pending" => "En attente".to_string(),
        "accepted" => "Accepté".to_string(),
        "refused" => "Refusé".to_string(),
        other => capitalize(other),
    }
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
