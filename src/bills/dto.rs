use serde::{Deserialize, Serialize};

/// Workflow state of an expense record. Drafts are always created as
/// `pending`; the two other states are assigned store-side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Accepted,
    Refused,
}

/// One expense record as delivered by the remote store. List responses may
/// omit any of the optional fields; decoding must not reject them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub date: String,
    /// Raw status value. Kept as a string because the store may deliver
    /// values outside the known set; display formatting owns the fallback.
    pub status: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "type")]
    pub expense_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub vat: Option<String>,
    #[serde(default)]
    pub pct: Option<i64>,
    #[serde(default)]
    pub commentary: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Date field of a display record: either the formatted form or, when
/// formatting failed, the raw value kept as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateDisplay {
    Formatted(String),
    Raw(String),
}

impl DateDisplay {
    pub fn as_str(&self) -> &str {
        match self {
            DateDisplay::Formatted(s) | DateDisplay::Raw(s) => s,
        }
    }

    /// True when formatting failed and the raw value was kept.
    pub fn is_raw_fallback(&self) -> bool {
        matches!(self, DateDisplay::Raw(_))
    }
}

/// Display copy of a [`Bill`]: same record with `date` and `status` run
/// through the formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayBill {
    pub id: String,
    pub date: DateDisplay,
    pub status: String,
    pub email: Option<String>,
    pub expense_type: Option<String>,
    pub name: Option<String>,
    pub amount: Option<i64>,
    pub vat: Option<String>,
    pub pct: Option<i64>,
    pub commentary: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
}

impl DisplayBill {
    pub fn from_record(record: Bill, date: DateDisplay, status: String) -> Self {
        Self {
            id: record.id,
            date,
            status,
            email: record.email,
            expense_type: record.expense_type,
            name: record.name,
            amount: record.amount,
            vat: record.vat,
            pct: record.pct,
            commentary: record.commentary,
            file_url: record.file_url,
            file_name: record.file_name,
        }
    }
}
