//! The canonical stores and a small match engine to map vendor free text onto them.

use crate::Vendor;
use std::fmt;

/// The amount of stores every table must contain.
pub const STORE_COUNT: usize = 6;
/// The maximum amount of characters of unmatched text kept in [`StoreRef::Unknown`].
pub const MAX_UNKNOWN_LEN: usize = 40;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to open store table file for reading")]
    Open(#[from] std::io::Error),
    #[error("Could not decode the store table")]
    Decode(#[from] ron::de::SpannedError),
    #[error("Expected exactly {expected} stores, but found {actual}")]
    StoreCount { expected: usize, actual: usize },
    #[error("Store id '{id}' does not follow the 'US#####' pattern")]
    InvalidId { id: String },
    #[error("Store id '{id}' was declared more than once")]
    DuplicateId { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Store {
    /// The stable identifier, like `US00001`.
    pub id: String,
    /// The name to show next to the id.
    pub label: String,
    /// Fragments of restaurant names as used on the vendor's storefront.
    pub name_tokens: Vec<String>,
    /// Fragments of the street address, like the street number.
    pub address_tokens: Vec<String>,
}

/// Which of the token sets of a [`Store`] to match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tokens {
    Name,
    Address,
}

/// The stores of the business, in match order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    stores: Vec<Store>,
}

/// The store a row belongs to, or the text that couldn't be matched to any store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StoreRef {
    Known { id: String, label: String },
    Unknown { raw: String },
}

impl StoreRef {
    /// Keep `raw` for display, trimmed and shortened to [`MAX_UNKNOWN_LEN`] characters.
    pub fn unknown(raw: &str) -> Self {
        let raw = raw.trim();
        let raw = if raw.chars().count() > MAX_UNKNOWN_LEN {
            let mut short: String = raw.chars().take(MAX_UNKNOWN_LEN).collect();
            short.push_str("...");
            short
        } else {
            raw.to_owned()
        };
        StoreRef::Unknown { raw }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            StoreRef::Known { id, .. } => Some(id),
            StoreRef::Unknown { .. } => None,
        }
    }
}

impl fmt::Display for StoreRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreRef::Known { id, label } => write!(f, "{id} - {label}"),
            StoreRef::Unknown { raw } if raw.is_empty() => f.write_str("Unknown store"),
            StoreRef::Unknown { raw } => write!(f, "Unknown store ({raw})"),
        }
    }
}

impl Store {
    pub fn reference(&self) -> StoreRef {
        StoreRef::Known {
            id: self.id.clone(),
            label: self.label.clone(),
        }
    }

    /// `compact` is expected to be upper-case and without spaces.
    fn has_code_in(&self, compact: &str) -> bool {
        compact.contains(&self.id.to_uppercase().replace(' ', ""))
    }

    /// `lowercase` is expected to be lower-case.
    fn has_token_in(&self, tokens: Tokens, lowercase: &str) -> bool {
        let tokens = match tokens {
            Tokens::Name => &self.name_tokens,
            Tokens::Address => &self.address_tokens,
        };
        tokens
            .iter()
            .map(|token| token.trim().to_lowercase())
            .any(|token| !token.is_empty() && lowercase.contains(&token))
    }
}

impl Table {
    /// Create a table from `stores`, which are matched in the given order.
    pub fn new(stores: Vec<Store>) -> Result<Self, Error> {
        if stores.len() != STORE_COUNT {
            return Err(Error::StoreCount {
                expected: STORE_COUNT,
                actual: stores.len(),
            });
        }
        for (idx, store) in stores.iter().enumerate() {
            if !is_store_id(&store.id) {
                return Err(Error::InvalidId {
                    id: store.id.clone(),
                });
            }
            if stores[..idx].iter().any(|other| other.id == store.id) {
                return Err(Error::DuplicateId {
                    id: store.id.clone(),
                });
            }
        }
        Ok(Table { stores })
    }

    /// Read a list of stores in RON notation from the file at `path`.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        Self::from_reader(std::fs::File::open(path)?)
    }

    /// Read a list of stores in RON notation from `read`.
    pub fn from_reader(read: impl std::io::Read) -> Result<Self, Error> {
        let stores: Vec<Store> = ron::de::from_reader(read)?;
        Self::new(stores)
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    /// Return the first store whose id is contained in `text`, ignoring case and spaces.
    pub fn by_code(&self, text: &str) -> Option<&Store> {
        let compact = text.to_uppercase().replace(' ', "");
        self.stores.iter().find(|store| store.has_code_in(&compact))
    }

    /// Return the first store that has any of its `tokens` contained in `text`, ignoring case.
    pub fn by_tokens(&self, tokens: Tokens, text: &str) -> Option<&Store> {
        let lowercase = text.to_lowercase();
        self.stores
            .iter()
            .find(|store| store.has_token_in(tokens, &lowercase))
    }

    /// Map the store description of a `vendor` row onto a store.
    ///
    /// `text` is the restaurant name for UberEats and DoorDash, and the street address for Grubhub, whose
    /// store numbers are unreliable and thus passed as `secondary` to be tried only after the address.
    /// Text that doesn't match is kept in [`StoreRef::Unknown`].
    pub fn normalize(&self, vendor: Vendor, text: &str, secondary: &str) -> StoreRef {
        let store = match vendor {
            Vendor::UberEats | Vendor::DoorDash => self
                .by_code(text)
                .or_else(|| self.by_tokens(Tokens::Name, text)),
            Vendor::Grubhub => self
                .by_code(text)
                .or_else(|| self.by_tokens(Tokens::Address, text))
                .or_else(|| self.by_code(secondary)),
        };
        match store {
            Some(store) => store.reference(),
            None if vendor == Vendor::Grubhub && !secondary.trim().is_empty() => {
                StoreRef::unknown(secondary)
            }
            None => StoreRef::unknown(text),
        }
    }
}

impl Default for Table {
    /// The six stores of the business.
    fn default() -> Self {
        fn store(id: &str, label: &str, name: &[&str], address: &[&str]) -> Store {
            Store {
                id: id.into(),
                label: label.into(),
                name_tokens: name.iter().map(|t| t.to_string()).collect(),
                address_tokens: address.iter().map(|t| t.to_string()).collect(),
            }
        }
        Table {
            stores: vec![
                store("US00001", "Broadway", &["broadway"], &["755", "broadway"]),
                store("US00002", "6th Ave", &["6th"], &["800", "6th"]),
                store("US00003", "Maiden Lane", &["maiden"], &["100", "maiden"]),
                store("US00004", "37th St", &["37th"], &["37th"]),
                store("US00005", "8th Ave", &["8th"], &["901", "8th"]),
                store("US00006", "Fulton St", &["fulton"], &["102", "fulton"]),
            ],
        }
    }
}

fn is_store_id(id: &str) -> bool {
    id.len() == 7
        && id.starts_with("US")
        && id.bytes().skip(2).all(|b| b.is_ascii_digit())
}
