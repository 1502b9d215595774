//! Lay out summaries as the sheets of a reconciliation workbook and hand them to a [`Sink`].

use crate::fees::{FeeCategory, Summary};
use crate::format_currency;
use crate::store::Table;
use std::path::PathBuf;

pub const FEE_BREAKDOWN: &str = "fee_breakdown";
pub const BANK_RECONCILIATION: &str = "bank_reconciliation";
pub const STORES: &str = "stores";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("Could not create the output directory at '{}'", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A destination for the sheets of the workbook.
pub trait Sink {
    /// Store the sheet `name` made of `rows`, the first of which is the header.
    fn sheet(&mut self, name: &str, rows: Vec<csv::StringRecord>) -> Result<(), Error>;
}

/// Keep sheets in memory, in the order they were written.
impl Sink for Vec<(String, Vec<csv::StringRecord>)> {
    fn sheet(&mut self, name: &str, rows: Vec<csv::StringRecord>) -> Result<(), Error> {
        self.push((name.to_owned(), rows));
        Ok(())
    }
}

/// Write each sheet as `<name>.csv` into a directory.
pub struct CsvSheets {
    dir: PathBuf,
}

impl CsvSheets {
    /// Create `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| Error::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(CsvSheets { dir })
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name).with_extension("csv")
    }
}

impl Sink for CsvSheets {
    fn sheet(&mut self, name: &str, rows: Vec<csv::StringRecord>) -> Result<(), Error> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(b',')
            .flexible(true)
            .from_path(self.path_of(name))?;
        for row in &rows {
            out.write_record(row)?;
        }
        out.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

/// Figures of a whole run, across vendors and stores.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub gross_sales: f64,
    /// The commission of all vendors as a positive amount, whatever sign the exports use.
    pub commission: f64,
    pub net_payout: f64,
    /// The amount of distinct stores with at least one summary, unknown stores included.
    pub active_stores: usize,
}

impl Totals {
    pub fn new(summaries: &[Summary]) -> Self {
        let mut stores = std::collections::BTreeSet::new();
        let mut totals = Totals::default();
        for summary in summaries {
            totals.gross_sales += summary.fees.gross_sales;
            totals.commission += summary.fees.commission.abs();
            totals.net_payout += summary.fees.net_payout;
            stores.insert(&summary.store);
        }
        totals.active_stores = stores.len();
        totals
    }
}

impl std::fmt::Display for Totals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "gross sales {}, commission {}, net payout {}, {} active stores",
            format_currency(self.gross_sales),
            format_currency(self.commission),
            format_currency(self.net_payout),
            self.active_stores
        )
    }
}

/// Write the fee breakdown, the bank reconciliation sheet with its formulas and the store reference to `sink`.
pub fn write(summaries: &[Summary], table: &Table, sink: &mut impl Sink) -> Result<(), Error> {
    sink.sheet(FEE_BREAKDOWN, fee_breakdown(summaries))?;
    sink.sheet(BANK_RECONCILIATION, bank_reconciliation(summaries))?;
    sink.sheet(STORES, stores(table))?;
    Ok(())
}

fn fee_breakdown(summaries: &[Summary]) -> Vec<csv::StringRecord> {
    let mut headers = csv::StringRecord::from(vec!["Vendor", "Store"]);
    for category in FeeCategory::ALL {
        headers.push_field(category.title());
        if category == FeeCategory::MerchantPromo {
            headers.push_field("Net Sales");
        }
    }

    let mut rows = vec![headers];
    for summary in summaries {
        let mut row = csv::StringRecord::new();
        row.push_field(summary.vendor.name());
        row.push_field(&summary.store.to_string());
        for category in FeeCategory::ALL {
            row.push_field(&format_currency(summary.fees.get(category)));
            if category == FeeCategory::MerchantPromo {
                row.push_field(&format_currency(summary.net_sales));
            }
        }
        rows.push(row);
    }
    rows
}

fn bank_reconciliation(summaries: &[Summary]) -> Vec<csv::StringRecord> {
    let mut rows = vec![csv::StringRecord::from(vec![
        "Vendor",
        "Store",
        "Computed Net Payout (A)",
        "Bank Deposit (B)",
        "Platform Adjustments (C)",
        "Variance (A-B+C)",
    ])];
    for (idx, summary) in summaries.iter().enumerate() {
        // spreadsheet rows are 1-based and the header takes the first one
        let line = idx + 2;
        rows.push(csv::StringRecord::from(vec![
            summary.vendor.name().to_owned(),
            summary.store.to_string(),
            plain_amount(summary.fees.net_payout),
            String::new(),
            String::new(),
            format!("=C{line}-D{line}+E{line}"),
        ]));
    }
    rows
}

fn stores(table: &Table) -> Vec<csv::StringRecord> {
    let mut rows = vec![csv::StringRecord::from(vec!["Store ID", "Store Name"])];
    for store in table.stores() {
        rows.push(csv::StringRecord::from(vec![
            store.id.as_str(),
            store.label.as_str(),
        ]));
    }
    rows
}

/// Amounts that formulas refer to are kept free of currency formatting.
fn plain_amount(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0 + 0.0;
    format!("{rounded:.2}")
}
