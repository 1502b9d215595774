use crate::Vendor;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No input was provided")]
    NoInput,
    #[error("None of the provided exports could be processed")]
    NoUsableInput { statuses: Vec<Status> },
}

/// The result of processing the export of a single vendor.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Ok {
        vendor: Vendor,
        records: usize,
        rows_read: usize,
    },
    /// Records were produced, but they need attention before being relied upon.
    Warning {
        vendor: Vendor,
        records: usize,
        rows_read: usize,
        message: String,
    },
    Failed { vendor: Vendor, error: String },
}

impl Status {
    pub fn vendor(&self) -> Vendor {
        match self {
            Status::Ok { vendor, .. }
            | Status::Warning { vendor, .. }
            | Status::Failed { vendor, .. } => *vendor,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Status::Failed { .. })
    }
}

fn processed(
    f: &mut fmt::Formatter<'_>,
    vendor: &Vendor,
    records: usize,
    rows_read: usize,
) -> fmt::Result {
    write!(f, "{vendor}: processed {records} records")?;
    if records != rows_read {
        write!(f, " ({} of {rows_read} rows dropped)", rows_read - records)?;
    }
    Ok(())
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok {
                vendor,
                records,
                rows_read,
            } => processed(f, vendor, *records, *rows_read),
            Status::Warning {
                vendor,
                records,
                rows_read,
                message,
            } => {
                processed(f, vendor, *records, *rows_read)?;
                write!(f, " WARNING: {message}")
            }
            Status::Failed { vendor, error } => write!(f, "{vendor}: FAILED: {error}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub ingest: crate::ingest::Options,
}

#[derive(Debug, Clone)]
pub struct Outcome {
    /// One status per provided export, in input order.
    pub statuses: Vec<Status>,
    /// The records of all vendors that could be processed.
    pub records: Vec<crate::fees::Record>,
    pub summaries: Vec<crate::fees::Summary>,
}

pub(crate) mod function {
    use crate::ingest::DateCheck;
    use crate::reconcile::{Error, Options, Outcome, Status};
    use crate::store::Table;
    use crate::{summarize, Vendor};

    /// Process the export of each vendor in `inputs` and summarize all records of the exports that could be read.
    ///
    /// An export may also be the error of opening it. A vendor whose export can't be opened or processed is
    /// reported in its status, and only if none of them can be processed the run fails.
    pub fn reconcile(
        inputs: impl IntoIterator<Item = (Vendor, std::io::Result<impl std::io::Read>)>,
        table: &Table,
        Options { ingest: options }: Options,
    ) -> Result<Outcome, Error> {
        let mut statuses = Vec::new();
        let mut records = Vec::new();
        for (vendor, data) in inputs {
            let outcome = data
                .map_err(|source| crate::ingest::Error::Read { vendor, source })
                .and_then(|data| crate::ingest(vendor, data, table, options.clone()));
            let status = match outcome {
                Ok(outcome) => {
                    let status = match outcome.date_check {
                        DateCheck::SkippedUnparseable => Status::Warning {
                            vendor,
                            records: outcome.records.len(),
                            rows_read: outcome.rows_read,
                            message: "transaction dates could not be parsed, rows of all dates were kept \
                                      instead of restricting them to the requested period"
                                .into(),
                        },
                        DateCheck::NotRequested | DateCheck::Applied => Status::Ok {
                            vendor,
                            records: outcome.records.len(),
                            rows_read: outcome.rows_read,
                        },
                    };
                    log::info!(
                        "{vendor}: {} of {} rows retained ({} outside of period, {} with implausible revenue)",
                        outcome.rows_retained,
                        outcome.rows_read,
                        outcome.dropped_out_of_period,
                        outcome.dropped_revenue
                    );
                    records.extend(outcome.records);
                    status
                }
                Err(err) => {
                    let error = with_causes(&err);
                    log::warn!("{vendor}: export skipped: {error}");
                    Status::Failed { vendor, error }
                }
            };
            statuses.push(status);
        }

        if statuses.is_empty() {
            return Err(Error::NoInput);
        }
        if !statuses.iter().any(Status::is_success) {
            return Err(Error::NoUsableInput { statuses });
        }
        let summaries = summarize(&records);
        Ok(Outcome {
            statuses,
            records,
            summaries,
        })
    }

    fn with_causes(err: &dyn std::error::Error) -> String {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
