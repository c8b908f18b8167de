use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// The fixed set of categories an item can be reported under.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
pub enum ItemCategory {
    Electronics,
    Keys,
    #[serde(rename = "Wallet/Purse")]
    WalletPurse,
    Clothing,
    #[serde(rename = "Bag/Backpack")]
    BagBackpack,
    #[serde(rename = "Jewelry/Watch")]
    JewelryWatch,
    #[serde(rename = "Book/Notebook")]
    BookNotebook,
    Pet,
    Identification,
    Other,
}

impl ItemCategory {
    pub const ALL: [Self; 10] = [
        Self::Electronics,
        Self::Keys,
        Self::WalletPurse,
        Self::Clothing,
        Self::BagBackpack,
        Self::JewelryWatch,
        Self::BookNotebook,
        Self::Pet,
        Self::Identification,
        Self::Other,
    ];

    /// The label as shown to users and stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Keys => "Keys",
            Self::WalletPurse => "Wallet/Purse",
            Self::Clothing => "Clothing",
            Self::BagBackpack => "Bag/Backpack",
            Self::JewelryWatch => "Jewelry/Watch",
            Self::BookNotebook => "Book/Notebook",
            Self::Pet => "Pet",
            Self::Identification => "Identification",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown item category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for ItemCategory {
    type Err = UnknownCategory;

    /// Accepts the label in any letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_case_insensitively() {
        assert_eq!("wallet/purse".parse(), Ok(ItemCategory::WalletPurse));
        assert_eq!(" Keys ".parse(), Ok(ItemCategory::Keys));
        assert!("Umbrella".parse::<ItemCategory>().is_err());
    }

    #[test]
    fn serde_uses_display_labels() {
        let json = serde_json::to_string(&ItemCategory::JewelryWatch).expect("serializable");
        assert_eq!(json, "\"Jewelry/Watch\"");
    }

    #[test]
    fn every_label_round_trips_through_from_str() {
        for category in ItemCategory::ALL {
            assert_eq!(category.as_str().parse(), Ok(category));
        }
    }
}
