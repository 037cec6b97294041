use bytes::Bytes;
use serde::Serialize;

use crate::bills::dto::BillStatus;
use crate::error::StoreError;

/// Field values read from the new-bill form, all free text.
#[derive(Debug, Clone, Default)]
pub struct BillForm {
    pub expense_type: String,
    pub name: String,
    pub amount: String,
    pub date: String,
    pub vat: String,
    pub pct: String,
    pub commentary: String,
}

/// Complete expense record assembled at submit time, serialized with the
/// store's wire field names.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BillDraft {
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub expense_type: String,
    pub name: String,
    pub amount: Option<i64>,
    pub date: String,
    pub vat: String,
    pub pct: Option<i64>,
    pub commentary: String,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub status: BillStatus,
}

/// First entry of the file input's selection.
#[derive(Debug, Clone)]
pub struct FileSelection {
    pub file_name: String,
    pub content: Bytes,
}

impl FileSelection {
    /// Build a selection from the input's raw value, stripping any path
    /// prefix (browsers report `C:\fakepath\...`).
    pub fn new(path: impl Into<String>, content: Bytes) -> Self {
        let path = path.into();
        let file_name = path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .to_string();
        Self { file_name, content }
    }
}

/// What happened to a file selection.
#[derive(Debug)]
pub enum UploadOutcome {
    /// Receipt stored; the controller captured the URL, name and bill key.
    Stored { file_url: String, key: String },
    /// Extension not accepted; the store was never contacted.
    Rejected { file_name: String },
    /// Store call failed. Logged, upload state left unset; the form stays
    /// usable and a later submit carries null file fields.
    Failed(StoreError),
}

/// What happened to a form submission. Navigation back to the bills list
/// happens in both cases.
#[derive(Debug)]
pub enum SubmitOutcome {
    Saved,
    FailedButNavigated(StoreError),
}
