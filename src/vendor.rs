//! The delivery platforms and the layout of their settlement exports.

use crate::fees::FeeCategory;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Vendor {
    UberEats,
    DoorDash,
    Grubhub,
}

impl Vendor {
    pub fn name(&self) -> &'static str {
        match self {
            Vendor::UberEats => "UberEats",
            Vendor::DoorDash => "DoorDash",
            Vendor::Grubhub => "Grubhub",
        }
    }

    pub fn layout(&self) -> &'static Layout {
        match self {
            Vendor::UberEats => &UBER_EATS,
            Vendor::DoorDash => &DOOR_DASH,
            Vendor::Grubhub => &GRUBHUB,
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the column names of a layout are compared to the cells of the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMatch {
    Exact,
    /// The header cell contains the column name, for exports which add suffixes like ` (USD)`.
    Contains,
}

/// Where to find the store a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreColumns {
    /// A required column with the restaurant name.
    Name(&'static str),
    /// Optional columns with the street address, and the store number to fall back to.
    AddressThenCode {
        address: &'static str,
        code: &'static str,
    },
}

/// The shape of a vendor export.
#[derive(Debug)]
pub struct Layout {
    /// Column names of which at least two appear verbatim in the header row.
    pub header_tokens: &'static [&'static str],
    pub column_match: ColumnMatch,
    pub store: StoreColumns,
    pub date_column: &'static str,
    /// The column that must be present and within bounds when filtering.
    pub revenue_column: &'static str,
    /// The columns to sum up for each category, categories not listed are zero.
    pub fees: &'static [(FeeCategory, &'static [&'static str])],
}

impl Layout {
    /// Return the index of `name` in the trimmed `headers`.
    pub fn column(&self, headers: &[String], name: &str) -> Option<usize> {
        match self.column_match {
            ColumnMatch::Exact => headers.iter().position(|header| header == name),
            ColumnMatch::Contains => headers.iter().position(|header| header.contains(name)),
        }
    }
}

static UBER_EATS: Layout = Layout {
    header_tokens: &["餐厅名称", "销售额（不含税费）", "平台服务费"],
    column_match: ColumnMatch::Exact,
    store: StoreColumns::Name("餐厅名称"),
    date_column: "订单日期",
    revenue_column: "销售额（不含税费）",
    fees: &[
        (FeeCategory::GrossSales, &["销售额（不含税费）"]),
        (FeeCategory::MerchantPromo, &["商品优惠（含税）"]),
        (FeeCategory::Commission, &["平台服务费"]),
        (FeeCategory::Marketing, &["营销调整额", "广告支出"]),
        (FeeCategory::TaxAdjustment, &["销售额税费", "平台代缴税"]),
        (FeeCategory::OtherFees, &["订单错误调整额", "派送网络费"]),
        (FeeCategory::NetPayout, &["收入总额"]),
    ],
};

static DOOR_DASH: Layout = Layout {
    header_tokens: &["店铺名称", "小计", "佣金"],
    column_match: ColumnMatch::Contains,
    store: StoreColumns::Name("店铺名称"),
    date_column: "时间戳本地日期",
    revenue_column: "小计",
    fees: &[
        (FeeCategory::GrossSales, &["小计"]),
        (FeeCategory::MerchantPromo, &["由您出资"]),
        (FeeCategory::Commission, &["佣金"]),
        (FeeCategory::Marketing, &["营销费", "营销积分"]),
        (FeeCategory::TaxAdjustment, &["税款小计"]),
        (FeeCategory::OtherFees, &["错误费用", "调整"]),
        (FeeCategory::NetPayout, &["净总计"]),
    ],
};

static GRUBHUB: Layout = Layout {
    header_tokens: &["store_name", "subtotal", "commission"],
    column_match: ColumnMatch::Exact,
    store: StoreColumns::AddressThenCode {
        address: "street_address",
        code: "store_number",
    },
    date_column: "transaction_date",
    revenue_column: "subtotal",
    fees: &[
        (FeeCategory::GrossSales, &["subtotal"]),
        (
            FeeCategory::MerchantPromo,
            &["merchant_funded_promotion", "merchant_funded_loyalty"],
        ),
        (FeeCategory::Commission, &["commission", "delivery_commission"]),
        (FeeCategory::TaxAdjustment, &["subtotal_sales_tax"]),
        (
            FeeCategory::OtherFees,
            &["processing_fee", "merchant_service_fee", "gh_plus_commission"],
        ),
        (FeeCategory::NetPayout, &["merchant_net_total"]),
    ],
};
