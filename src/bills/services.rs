use std::sync::Arc;

use tracing::{debug, warn};

use super::dto::{Bill, DateDisplay, DisplayBill};
use crate::error::StoreError;
use crate::format::{Formatter, LocaleFormatter};
use crate::state::AppContext;
use crate::store::BillsStore;

/// Drives the bills list page: fetches records, formats them for display
/// and builds the receipt dialog.
pub struct BillsController {
    store: Option<Arc<dyn BillsStore>>,
    formatter: Arc<dyn Formatter>,
}

/// Payload of the receipt dialog opened from the eye icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptModal {
    pub body: String,
    pub shown: bool,
}

impl BillsController {
    pub fn new(ctx: &AppContext) -> Self {
        Self::from_parts(ctx.store.clone(), Arc::new(LocaleFormatter))
    }

    pub fn from_parts(store: Option<Arc<dyn BillsStore>>, formatter: Arc<dyn Formatter>) -> Self {
        Self { store, formatter }
    }

    /// Fetch the bill list and produce display copies, one per record.
    ///
    /// A record whose date cannot be formatted is kept with its raw date;
    /// one bad record never suppresses the rest of the list. A store
    /// failure propagates unchanged. The canonical page flow sorts the raw
    /// list with [`sort_antichrono`] before calling this.
    pub async fn get_bills(&self) -> Result<Vec<DisplayBill>, StoreError> {
        let Some(store) = &self.store else {
            debug!("no store configured; bills list defaults to empty");
            return Ok(Vec::new());
        };

        let records = store.list().await?;
        Ok(records
            .into_iter()
            .map(|record| self.to_display(record))
            .collect())
    }

    fn to_display(&self, record: Bill) -> DisplayBill {
        let status = self.formatter.format_status(&record.status);
        let date = match self.formatter.format_date(&record.date) {
            Ok(formatted) => DateDisplay::Formatted(formatted),
            Err(e) => {
                warn!(error = %e, bill_id = %record.id, "date formatting failed, keeping raw value");
                DateDisplay::Raw(record.date.clone())
            }
        };
        DisplayBill::from_record(record, date, status)
    }

    /// Build the receipt dialog for the clicked eye icon. The image takes
    /// half the dialog width; with no receipt URL the markup generator's
    /// fallback content is shown instead.
    pub fn handle_click_icon_eye(
        &self,
        receipt_url: Option<&str>,
        modal_width: u32,
    ) -> ReceiptModal {
        ReceiptModal {
            body: receipt_markup(receipt_url, modal_width / 2),
            shown: true,
        }
    }
}

/// Presentation sort: most recent date first. Raw ISO dates, so lexical and
/// chronological order coincide.
pub fn sort_antichrono(bills: &mut [Bill]) {
    bills.sort_by(|a, b| b.date.cmp(&a.date));
}

fn receipt_markup(url: Option<&str>, width: u32) -> String {
    match url {
        Some(url) => format!(
            r#"<div style='text-align: center;'><img width={width} src="{url}" alt="Bill" /></div>"#
        ),
        None => "<div style='text-align: center;'>Justificatif non disponible</div>".to_string(),
    }
}
