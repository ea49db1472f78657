//! Canonical statement sections.
//!
//! Each section is a fixed set of named numeric fields, every one optional. A
//! section whose fields are all absent is represented by `None` at the record level.

use crate::concepts::{balance_sheet, cash_flow, income_statement, resolve_concept};
use crate::utils::{checked_delta, checked_sum};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field-wise operations shared by every statement section.
pub trait StatementSection: Sized + Clone {
    fn from_tags(tags: &BTreeMap<String, f64>) -> Self;

    fn is_empty(&self) -> bool;

    /// Field-by-field `self - other`; a field is `None` if either side is.
    fn delta(&self, other: &Self) -> Self;

    /// Field-by-field `self + other`; a field is `None` if either side is.
    fn sum(&self, other: &Self) -> Self;

    /// Resolves the section from tags, returning `None` if nothing resolved.
    fn resolve(tags: &BTreeMap<String, f64>) -> Option<Self> {
        Some(Self::from_tags(tags)).filter(|s| !s.is_empty())
    }

    /// Section-level delta. A missing operand makes every field unknown.
    fn delta_of(a: Option<&Self>, b: Option<&Self>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => Some(a.delta(b)).filter(|s| !s.is_empty()),
            _ => None,
        }
    }

    fn sum_of(a: Option<&Self>, b: Option<&Self>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => Some(a.sum(b)).filter(|s| !s.is_empty()),
            _ => None,
        }
    }
}

macro_rules! statement_section {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $field:ident => $aliases:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $( pub $field: Option<f64>, )+
        }

        impl StatementSection for $name {
            fn from_tags(tags: &BTreeMap<String, f64>) -> Self {
                Self { $( $field: resolve_concept(tags, $aliases), )+ }.normalized()
            }

            fn is_empty(&self) -> bool {
                $( self.$field.is_none() )&&+
            }

            fn delta(&self, other: &Self) -> Self {
                Self { $( $field: checked_delta(self.$field, other.$field), )+ }.normalized()
            }

            fn sum(&self, other: &Self) -> Self {
                Self { $( $field: checked_sum(self.$field, other.$field), )+ }.normalized()
            }
        }
    };
}

statement_section! {
    /// Income statement (profit and loss) for a duration.
    pub struct IncomeStatement {
        revenue => income_statement::REVENUE,
        cogs => income_statement::COGS,
        gross_profit => income_statement::GROSS_PROFIT,
        research_and_development => income_statement::RESEARCH_AND_DEVELOPMENT,
        selling_general_administrative => income_statement::SELLING_GENERAL_ADMINISTRATIVE,
        operating_expenses => income_statement::OPERATING_EXPENSES,
        operating_income => income_statement::OPERATING_INCOME,
        interest_expense => income_statement::INTEREST_EXPENSE,
        pretax_income => income_statement::PRETAX_INCOME,
        income_tax => income_statement::INCOME_TAX,
        net_income => income_statement::NET_INCOME,
    }
}

statement_section! {
    /// Cash flow statement for a duration.
    pub struct CashFlow {
        cfo => cash_flow::CFO,
        capex => cash_flow::CAPEX,
        fcf => cash_flow::FCF,
        cfi => cash_flow::CFI,
        cff => cash_flow::CFF,
        depreciation_amortization => cash_flow::DEPRECIATION_AMORTIZATION,
        stock_based_compensation => cash_flow::STOCK_BASED_COMPENSATION,
        dividends_paid => cash_flow::DIVIDENDS_PAID,
        share_repurchases => cash_flow::SHARE_REPURCHASES,
    }
}

statement_section! {
    /// Point-in-time balance sheet snapshot.
    pub struct BalanceSheet {
        cash => balance_sheet::CASH,
        short_term_investments => balance_sheet::SHORT_TERM_INVESTMENTS,
        receivables => balance_sheet::RECEIVABLES,
        inventory => balance_sheet::INVENTORY,
        current_assets => balance_sheet::CURRENT_ASSETS,
        total_assets => balance_sheet::TOTAL_ASSETS,
        accounts_payable => balance_sheet::ACCOUNTS_PAYABLE,
        current_liabilities => balance_sheet::CURRENT_LIABILITIES,
        long_term_debt => balance_sheet::LONG_TERM_DEBT,
        total_liabilities => balance_sheet::TOTAL_LIABILITIES,
        stockholders_equity => balance_sheet::STOCKHOLDERS_EQUITY,
        shares_outstanding => balance_sheet::SHARES_OUTSTANDING,
    }
}

impl IncomeStatement {
    fn normalized(self) -> Self {
        self
    }
}

impl BalanceSheet {
    fn normalized(self) -> Self {
        self
    }
}

impl CashFlow {
    /// Free cash flow is never taken from upstream data.
    fn normalized(self) -> Self {
        self.with_free_cash_flow()
    }

    pub fn with_free_cash_flow(mut self) -> Self {
        self.fcf = checked_delta(self.cfo, self.capex);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_income_statement_from_tags() {
        let pl = IncomeStatement::from_tags(&tags(&[
            ("Revenues", 400.0),
            ("CostOfRevenue", 250.0),
            ("NetIncomeLoss", 40.0),
        ]));
        assert_eq!(pl.revenue, Some(400.0));
        assert_eq!(pl.cogs, Some(250.0));
        assert_eq!(pl.net_income, Some(40.0));
        assert_eq!(pl.gross_profit, None);
        assert!(!pl.is_empty());
    }

    #[test]
    fn test_resolve_returns_none_for_empty_section() {
        let t = tags(&[("Assets", 1000.0)]);
        assert!(IncomeStatement::resolve(&t).is_none());
        assert!(CashFlow::resolve(&t).is_none());
        assert_eq!(BalanceSheet::resolve(&t).unwrap().total_assets, Some(1000.0));
    }

    #[test]
    fn test_free_cash_flow_ignores_upstream_tag() {
        let cf = CashFlow::from_tags(&tags(&[
            ("NetCashProvidedByUsedInOperatingActivities", 100.0),
            ("PaymentsToAcquirePropertyPlantAndEquipment", 30.0),
            ("FreeCashFlow", 999.0),
        ]));
        assert_eq!(cf.fcf, Some(70.0));

        let partial = CashFlow::from_tags(&tags(&[(
            "NetCashProvidedByUsedInOperatingActivities",
            100.0,
        )]));
        assert_eq!(partial.fcf, None);
    }

    #[test]
    fn test_delta_is_null_propagating() {
        let annual = IncomeStatement {
            revenue: Some(400.0),
            net_income: Some(40.0),
            ..Default::default()
        };
        let ytd = IncomeStatement {
            revenue: Some(280.0),
            ..Default::default()
        };
        let q4 = annual.delta(&ytd);
        assert_eq!(q4.revenue, Some(120.0));
        assert_eq!(q4.net_income, None);
        assert_eq!(q4.cogs, None);
    }

    #[test]
    fn test_section_level_delta_with_missing_operand() {
        let annual = CashFlow {
            cfo: Some(500.0),
            capex: Some(100.0),
            ..Default::default()
        };
        assert!(CashFlow::delta_of(Some(&annual), None).is_none());

        let ytd = CashFlow {
            cfo: Some(350.0),
            capex: Some(60.0),
            ..Default::default()
        };
        let q4 = CashFlow::delta_of(Some(&annual), Some(&ytd)).unwrap();
        assert_eq!(q4.cfo, Some(150.0));
        assert_eq!(q4.capex, Some(40.0));
        assert_eq!(q4.fcf, Some(110.0));
    }

    #[test]
    fn test_serializes_camel_case_with_nulls() {
        let pl = IncomeStatement {
            gross_profit: Some(1.0),
            ..Default::default()
        };
        let json = serde_json::to_value(&pl).unwrap();
        assert_eq!(json["grossProfit"], serde_json::json!(1.0));
        assert!(json["revenue"].is_null());
    }
}
