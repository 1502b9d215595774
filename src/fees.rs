//! The fee schema all vendor exports are mapped onto.

use crate::store::StoreRef;
use crate::Vendor;

/// An accounting bucket every vendor's amounts are sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeeCategory {
    GrossSales,
    /// Promotions paid for by the merchant, always stored as a non-positive amount.
    MerchantPromo,
    Commission,
    Marketing,
    TaxAdjustment,
    OtherFees,
    NetPayout,
}

impl FeeCategory {
    pub const ALL: [FeeCategory; 7] = [
        FeeCategory::GrossSales,
        FeeCategory::MerchantPromo,
        FeeCategory::Commission,
        FeeCategory::Marketing,
        FeeCategory::TaxAdjustment,
        FeeCategory::OtherFees,
        FeeCategory::NetPayout,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            FeeCategory::GrossSales => "Gross Sales",
            FeeCategory::MerchantPromo => "Merchant Promotion",
            FeeCategory::Commission => "Commission",
            FeeCategory::Marketing => "Marketing",
            FeeCategory::TaxAdjustment => "Tax Adjustment",
            FeeCategory::OtherFees => "Other Fees",
            FeeCategory::NetPayout => "Net Payout",
        }
    }

    /// Apply the sign convention of this category to a single amount.
    ///
    /// Merchant promotions are costs, so positive amounts are negated. All other categories keep the sign
    /// of the export.
    pub fn signed(&self, value: f64) -> f64 {
        match self {
            FeeCategory::MerchantPromo if value > 0.0 => -value,
            _ => value,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Fees {
    pub gross_sales: f64,
    pub merchant_promo: f64,
    pub commission: f64,
    pub marketing: f64,
    pub tax_adjustment: f64,
    pub other_fees: f64,
    pub net_payout: f64,
}

impl Fees {
    pub fn get(&self, category: FeeCategory) -> f64 {
        match category {
            FeeCategory::GrossSales => self.gross_sales,
            FeeCategory::MerchantPromo => self.merchant_promo,
            FeeCategory::Commission => self.commission,
            FeeCategory::Marketing => self.marketing,
            FeeCategory::TaxAdjustment => self.tax_adjustment,
            FeeCategory::OtherFees => self.other_fees,
            FeeCategory::NetPayout => self.net_payout,
        }
    }

    /// Store `value` in `category`, with the sign convention of [`FeeCategory::signed()`] applied.
    ///
    /// Amounts summed up from multiple columns should be signed one by one before, as a positive and a
    /// negative promotion are both costs.
    pub fn set(&mut self, category: FeeCategory, value: f64) {
        let value = category.signed(value);
        let field = match category {
            FeeCategory::GrossSales => &mut self.gross_sales,
            FeeCategory::MerchantPromo => &mut self.merchant_promo,
            FeeCategory::Commission => &mut self.commission,
            FeeCategory::Marketing => &mut self.marketing,
            FeeCategory::TaxAdjustment => &mut self.tax_adjustment,
            FeeCategory::OtherFees => &mut self.other_fees,
            FeeCategory::NetPayout => &mut self.net_payout,
        };
        *field = value;
    }

    /// Gross sales reduced by the merchant's promotions.
    pub fn net_sales(&self) -> f64 {
        self.gross_sales + self.merchant_promo
    }
}

impl std::ops::AddAssign<&Fees> for Fees {
    fn add_assign(&mut self, rhs: &Fees) {
        self.gross_sales += rhs.gross_sales;
        self.merchant_promo += rhs.merchant_promo;
        self.commission += rhs.commission;
        self.marketing += rhs.marketing;
        self.tax_adjustment += rhs.tax_adjustment;
        self.other_fees += rhs.other_fees;
        self.net_payout += rhs.net_payout;
    }
}

/// One row of a vendor export, in the shared schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub vendor: Vendor,
    pub store: StoreRef,
    pub fees: Fees,
}

/// All records of a vendor and store, summed up.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub vendor: Vendor,
    pub store: StoreRef,
    pub fees: Fees,
    pub net_sales: f64,
}
