use crate::options::Args;
use anyhow::Context;
use clap::Parser;
use payrecon::{ingest, reconcile, report, store, Vendor};
use std::path::PathBuf;

mod options {
    use payrecon::ingest::Filter;
    use payrecon::period::Period;
    use std::path::PathBuf;

    #[derive(Debug, clap::Parser)]
    #[clap(
        name = "payrecon",
        about = "Turn delivery platform settlement exports into a fee breakdown and a bank reconciliation sheet"
    )]
    pub struct Args {
        /// The monthly CSV export of UberEats.
        #[clap(long, short = 'u')]
        pub uber_eats: Option<PathBuf>,
        /// The monthly CSV export of DoorDash.
        #[clap(long, short = 'd')]
        pub door_dash: Option<PathBuf>,
        /// The monthly CSV export of Grubhub.
        #[clap(long, short = 'g')]
        pub grubhub: Option<PathBuf>,
        /// The directory to write one CSV file per sheet into.
        #[clap(long, short = 'o')]
        pub out: PathBuf,
        /// A RON file with the six stores to use instead of the built-in ones.
        #[clap(long, short = 's')]
        pub stores: Option<PathBuf>,
        /// Only keep transactions of this month, given as YYYY-MM.
        #[clap(long, short = 'p')]
        pub period: Option<Period>,
        /// When restricting to a period, drop transactions whose revenue exceeds this amount.
        #[clap(long, short = 'm', default_value_t = Filter::DEFAULT_MAX_REVENUE)]
        pub max_revenue: f64,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let Args {
        uber_eats,
        door_dash,
        grubhub,
        out,
        stores,
        period,
        max_revenue,
    } = Args::parse();

    let table = match stores {
        Some(path) => store::Table::from_path(&path)
            .with_context(|| format!("Could not load store table at '{}'", path.display()))?,
        None => store::Table::default(),
    };
    let inputs = open(
        [
            (Vendor::UberEats, uber_eats),
            (Vendor::DoorDash, door_dash),
            (Vendor::Grubhub, grubhub),
        ]
        .into_iter()
        .filter_map(|(vendor, path)| path.map(|path| (vendor, path))),
    );

    let outcome = match payrecon::reconcile(
        inputs,
        &table,
        reconcile::Options {
            ingest: ingest::Options {
                filter: period.map(|period| ingest::Filter {
                    period,
                    max_revenue,
                }),
            },
        },
    ) {
        Ok(outcome) => outcome,
        Err(reconcile::Error::NoUsableInput { statuses }) => {
            for status in &statuses {
                eprintln!("{status}");
            }
            anyhow::bail!("None of the provided exports could be processed, no report was written")
        }
        Err(err) => return Err(err).context("Please provide at least one export"),
    };
    for status in &outcome.statuses {
        eprintln!("{status}");
    }

    let mut sink = report::CsvSheets::new(&out)?;
    report::write(&outcome.summaries, &table, &mut sink)
        .with_context(|| format!("Could not write the report into '{}'", out.display()))?;
    eprintln!("Totals: {}", report::Totals::new(&outcome.summaries));
    eprintln!(
        "Wrote {} summary rows to '{}'",
        outcome.summaries.len(),
        out.display()
    );
    Ok(())
}

/// Open each file lazily, keeping the path in the error so a failing vendor can still say which file it was.
fn open(
    file_paths: impl Iterator<Item = (Vendor, PathBuf)>,
) -> impl Iterator<Item = (Vendor, std::io::Result<std::io::BufReader<std::fs::File>>)> {
    file_paths.map(|(vendor, p)| {
        let file = std::fs::File::open(&p)
            .map(std::io::BufReader::new)
            .map_err(|err| std::io::Error::new(err.kind(), format!("'{}': {err}", p.display())));
        (vendor, file)
    })
}

#[cfg(test)]
mod tests {
    use super::options::Args;
    use clap::Parser;
    use payrecon::ingest::Filter;

    #[test]
    fn max_revenue_defaults_to_the_filter_limit() {
        let args = Args::try_parse_from(["payrecon", "--out", "out"]).unwrap();
        assert_eq!(args.max_revenue, Filter::DEFAULT_MAX_REVENUE);
        let args = Args::try_parse_from(["payrecon", "-o", "out", "-m", "250.5"]).unwrap();
        assert_eq!(args.max_revenue, 250.5);
    }
}
