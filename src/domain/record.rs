//! Floor sheet record entity

use serde::{Deserialize, Serialize};

/// One transaction row from the floor sheet table.
///
/// All fields are opaque text exactly as scraped; no numeric parsing happens
/// at this layer. The contract number is the natural key: two records with the
/// same contract number are the same transaction. Serialized field names match
/// the historical data file so previously collected files load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorSheetRecord {
    #[serde(rename = "SN")]
    pub sn: String,
    #[serde(rename = "Contract No.")]
    pub contract_no: String,
    #[serde(rename = "Stock Symbol")]
    pub stock_symbol: String,
    #[serde(rename = "Buyer")]
    pub buyer: String,
    #[serde(rename = "Seller")]
    pub seller: String,
    #[serde(rename = "Quantity")]
    pub quantity: String,
    #[serde(rename = "Rate (Rs)")]
    pub rate: String,
    #[serde(rename = "Amount (Rs)")]
    pub amount: String,
}

impl FloorSheetRecord {
    /// Build a record from ordered cell texts.
    ///
    /// Missing cells become empty strings rather than an error: dropping a
    /// whole page over one malformed row loses more data than keeping the row
    /// with gaps.
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |index: usize| {
            cells
                .get(index)
                .map(|text| text.trim().to_owned())
                .unwrap_or_default()
        };

        Self {
            sn: cell(0),
            contract_no: cell(1),
            stock_symbol: cell(2),
            buyer: cell(3),
            seller: cell(4),
            quantity: cell(5),
            rate: cell(6),
            amount: cell(7),
        }
    }
}
