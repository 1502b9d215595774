use crate::fees::{Fees, Record, Summary};
use crate::store::StoreRef;
use crate::Vendor;
use std::collections::BTreeMap;

/// Sum up the fees of all `records` per vendor and store.
///
/// The output is sorted by vendor and then by store, with known stores before unknown ones.
pub fn summarize<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<Summary> {
    let mut groups = BTreeMap::<(Vendor, StoreRef), Fees>::new();
    for record in records {
        *groups
            .entry((record.vendor, record.store.clone()))
            .or_default() += &record.fees;
    }
    groups
        .into_iter()
        .map(|((vendor, store), fees)| Summary {
            vendor,
            store,
            net_sales: fees.net_sales(),
            fees,
        })
        .collect()
}
