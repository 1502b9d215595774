use crate::period::Period;
use crate::{fees::Record, Vendor};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not read the {vendor} export")]
    Read {
        vendor: Vendor,
        source: std::io::Error,
    },
    #[error("No row with at least two of the {vendor} columns {tokens:?} was found, the export is unusable")]
    HeaderNotFound {
        vendor: Vendor,
        tokens: &'static [&'static str],
    },
    #[error("The {vendor} export has no '{column}' column")]
    MissingColumn {
        vendor: Vendor,
        column: &'static str,
    },
    #[error("The {vendor} export is not valid CSV")]
    Csv { vendor: Vendor, source: csv::Error },
}

/// Restrict the rows of an export to a month and to plausible revenues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Filter {
    pub period: Period,
    /// Rows with a revenue of a larger magnitude are considered anomalies and dropped.
    pub max_revenue: f64,
}

impl Filter {
    pub const DEFAULT_MAX_REVENUE: f64 = 10_000.0;
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// If set, rows outside of the period or with missing or excessive revenue are dropped.
    pub filter: Option<Filter>,
}

/// What happened to the period restriction of a [`Filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCheck {
    /// No filter was given.
    NotRequested,
    /// Rows outside of the period were dropped.
    Applied,
    /// The export had no usable dates at all, so all rows were kept regardless of their date.
    SkippedUnparseable,
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub vendor: Vendor,
    /// One record for each retained row, in file order.
    pub records: Vec<Record>,
    /// The amount of rows below the header.
    pub rows_read: usize,
    pub rows_retained: usize,
    pub dropped_out_of_period: usize,
    pub dropped_revenue: usize,
    pub date_check: DateCheck,
}

pub(crate) mod function {
    use crate::fees::{FeeCategory, Fees, Record};
    use crate::ingest::{DateCheck, Error, Filter, Options, Outcome};
    use crate::store::Table;
    use crate::vendor::StoreColumns;
    use crate::{clean_number, header, period, Vendor};

    /// Read the export of `vendor` from `data` and map each of its rows onto a [`Record`], with stores
    /// looked up in `table`.
    pub fn ingest(
        vendor: Vendor,
        mut data: impl std::io::Read,
        table: &Table,
        Options { filter }: Options,
    ) -> Result<Outcome, Error> {
        let mut content = Vec::new();
        data.read_to_end(&mut content)
            .map_err(|source| Error::Read { vendor, source })?;

        let layout = vendor.layout();
        let header_not_found = || Error::HeaderNotFound {
            vendor,
            tokens: layout.header_tokens,
        };
        let position =
            header::find(&content, layout.header_tokens).ok_or_else(header_not_found)?;
        log::debug!("{vendor}: found header on line {}", position.line);

        let mut records = header::records(&content[position.offset..]).into_byte_records();
        let headers: Vec<String> = records
            .next()
            .ok_or_else(header_not_found)?
            .map_err(|source| Error::Csv { vendor, source })?
            .iter()
            .map(header::cell)
            .collect();
        let rows = records
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| Error::Csv { vendor, source })?;

        let fee_columns: Vec<(FeeCategory, Vec<usize>)> = layout
            .fees
            .iter()
            .map(|(category, names)| {
                let indices = names
                    .iter()
                    .filter_map(|name| layout.column(&headers, name))
                    .collect();
                (*category, indices)
            })
            .collect();
        let (store_index, secondary_store_index) = match layout.store {
            StoreColumns::Name(name) => (
                Some(
                    layout
                        .column(&headers, name)
                        .ok_or(Error::MissingColumn {
                            vendor,
                            column: name,
                        })?,
                ),
                None,
            ),
            StoreColumns::AddressThenCode { address, code } => (
                layout.column(&headers, address),
                layout.column(&headers, code),
            ),
        };
        let revenue_index = layout.column(&headers, layout.revenue_column);
        let text_at = |record: &csv::ByteRecord, index: Option<usize>| -> String {
            index
                .and_then(|index| record.get(index))
                .map(header::cell)
                .unwrap_or_default()
        };

        let (date_check, dates) = match filter {
            None => (DateCheck::NotRequested, Vec::new()),
            Some(_) => {
                let date_index = layout.column(&headers, layout.date_column);
                let dates: Vec<_> = rows
                    .iter()
                    .map(|record| {
                        date_index.and_then(|_| period::parse_date(&text_at(record, date_index)))
                    })
                    .collect();
                let unusable = date_index.is_none()
                    || (!rows.is_empty() && dates.iter().all(Option::is_none));
                if unusable {
                    log::warn!(
                        "{vendor}: no transaction date in column '{}' could be parsed, keeping rows of all dates",
                        layout.date_column
                    );
                    (DateCheck::SkippedUnparseable, dates)
                } else {
                    (DateCheck::Applied, dates)
                }
            }
        };

        let mut out = Outcome {
            vendor,
            records: Vec::with_capacity(rows.len()),
            rows_read: rows.len(),
            rows_retained: 0,
            dropped_out_of_period: 0,
            dropped_revenue: 0,
            date_check,
        };
        for (row_index, record) in rows.iter().enumerate() {
            if let Some(Filter {
                period,
                max_revenue,
            }) = filter
            {
                if date_check == DateCheck::Applied
                    && !dates[row_index].is_some_and(|date| period.contains(date))
                {
                    out.dropped_out_of_period += 1;
                    continue;
                }
                let revenue = text_at(record, revenue_index);
                if revenue.is_empty() || clean_number(revenue.as_str()).abs() > max_revenue {
                    log::debug!("{vendor}: dropping row {row_index} with revenue '{revenue}'");
                    out.dropped_revenue += 1;
                    continue;
                }
            }

            let mut fees = Fees::default();
            for (category, indices) in &fee_columns {
                let value: f64 = indices
                    .iter()
                    .filter_map(|index| record.get(*index))
                    .map(|field| category.signed(clean_number(field)))
                    .sum();
                fees.set(*category, value);
            }
            let store = table.normalize(
                vendor,
                &text_at(record, store_index),
                &text_at(record, secondary_store_index),
            );
            out.records.push(Record {
                vendor,
                store,
                fees,
            });
        }
        out.rows_retained = out.records.len();
        Ok(out)
    }
}
