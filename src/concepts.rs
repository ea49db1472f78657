//! Canonical field aliases and the concept resolver.
//!
//! Filers report the same fact under different taxonomy names depending on the
//! filer and the taxonomy version. Each canonical field carries a static,
//! priority-ordered list of alias tags; the first alias present is authoritative.

use std::collections::BTreeMap;

/// Returns the value of the first alias present in `tags`, or `None`.
///
/// Aliases name the same fact, so values are never summed or averaged across them.
/// A tag key with a taxonomy prefix (`us-gaap:Revenues`) also matches the bare alias.
pub fn resolve_concept(tags: &BTreeMap<String, f64>, aliases: &[&str]) -> Option<f64> {
    aliases.iter().find_map(|alias| {
        tags.get(*alias).copied().or_else(|| {
            tags.iter()
                .find(|(key, _)| strip_taxonomy(key) == *alias)
                .map(|(_, value)| *value)
        })
    })
}

fn strip_taxonomy(tag: &str) -> &str {
    tag.rsplit_once(':').map_or(tag, |(_, name)| name)
}

/// Income statement aliases
pub mod income_statement {
    pub const REVENUE: &[&str] = &[
        "RevenueFromContractWithCustomerExcludingAssessedTax",
        "Revenues",
        "SalesRevenueNet",
        "RevenueFromContractWithCustomerIncludingAssessedTax",
    ];
    pub const COGS: &[&str] = &[
        "CostOfRevenue",
        "CostOfGoodsAndServicesSold",
        "CostOfGoodsSold",
    ];
    pub const GROSS_PROFIT: &[&str] = &["GrossProfit"];
    pub const RESEARCH_AND_DEVELOPMENT: &[&str] = &[
        "ResearchAndDevelopmentExpense",
        "ResearchAndDevelopmentExpenseExcludingAcquiredInProcessCost",
    ];
    pub const SELLING_GENERAL_ADMINISTRATIVE: &[&str] = &[
        "SellingGeneralAndAdministrativeExpense",
        "GeneralAndAdministrativeExpense",
    ];
    pub const OPERATING_EXPENSES: &[&str] = &["OperatingExpenses", "CostsAndExpenses"];
    pub const OPERATING_INCOME: &[&str] = &["OperatingIncomeLoss"];
    pub const INTEREST_EXPENSE: &[&str] = &["InterestExpense", "InterestExpenseDebt"];
    pub const PRETAX_INCOME: &[&str] = &[
        "IncomeLossFromContinuingOperationsBeforeIncomeTaxesExtraordinaryItemsNoncontrollingInterest",
        "IncomeLossFromContinuingOperationsBeforeIncomeTaxesMinorityInterestAndIncomeLossFromEquityMethodInvestments",
    ];
    pub const INCOME_TAX: &[&str] = &["IncomeTaxExpenseBenefit"];
    pub const NET_INCOME: &[&str] = &[
        "NetIncomeLoss",
        "ProfitLoss",
        "NetIncomeLossAvailableToCommonStockholdersBasic",
    ];
}

/// Cash flow statement aliases
pub mod cash_flow {
    pub const CFO: &[&str] = &[
        "NetCashProvidedByUsedInOperatingActivities",
        "NetCashProvidedByUsedInOperatingActivitiesContinuingOperations",
    ];
    pub const CAPEX: &[&str] = &[
        "PaymentsToAcquirePropertyPlantAndEquipment",
        "PaymentsToAcquireProductiveAssets",
        "PaymentsForCapitalImprovements",
    ];
    /// Free cash flow is always recomputed from `cfo - capex`.
    pub const FCF: &[&str] = &[];
    pub const CFI: &[&str] = &[
        "NetCashProvidedByUsedInInvestingActivities",
        "NetCashProvidedByUsedInInvestingActivitiesContinuingOperations",
    ];
    pub const CFF: &[&str] = &[
        "NetCashProvidedByUsedInFinancingActivities",
        "NetCashProvidedByUsedInFinancingActivitiesContinuingOperations",
    ];
    pub const DEPRECIATION_AMORTIZATION: &[&str] = &[
        "DepreciationDepletionAndAmortization",
        "DepreciationAmortizationAndAccretionNet",
        "DepreciationAndAmortization",
    ];
    pub const STOCK_BASED_COMPENSATION: &[&str] = &["ShareBasedCompensation"];
    pub const DIVIDENDS_PAID: &[&str] = &["PaymentsOfDividends", "PaymentsOfDividendsCommonStock"];
    pub const SHARE_REPURCHASES: &[&str] = &["PaymentsForRepurchaseOfCommonStock"];
}

/// Balance sheet aliases
pub mod balance_sheet {
    pub const CASH: &[&str] = &[
        "CashAndCashEquivalentsAtCarryingValue",
        "CashCashEquivalentsRestrictedCashAndRestrictedCashEquivalents",
        "Cash",
    ];
    pub const SHORT_TERM_INVESTMENTS: &[&str] = &[
        "ShortTermInvestments",
        "MarketableSecuritiesCurrent",
        "AvailableForSaleSecuritiesDebtSecuritiesCurrent",
    ];
    pub const RECEIVABLES: &[&str] = &[
        "AccountsReceivableNetCurrent",
        "AccountsReceivableNet",
        "ReceivablesNetCurrent",
    ];
    pub const INVENTORY: &[&str] = &["InventoryNet", "Inventories"];
    pub const CURRENT_ASSETS: &[&str] = &["AssetsCurrent"];
    pub const TOTAL_ASSETS: &[&str] = &["Assets"];
    pub const ACCOUNTS_PAYABLE: &[&str] = &[
        "AccountsPayableCurrent",
        "AccountsPayableAndAccruedLiabilitiesCurrent",
    ];
    pub const CURRENT_LIABILITIES: &[&str] = &["LiabilitiesCurrent"];
    pub const LONG_TERM_DEBT: &[&str] = &[
        "LongTermDebtNoncurrent",
        "LongTermDebt",
        "LongTermDebtAndCapitalLeaseObligations",
    ];
    pub const TOTAL_LIABILITIES: &[&str] = &["Liabilities"];
    pub const STOCKHOLDERS_EQUITY: &[&str] = &[
        "StockholdersEquity",
        "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
    ];
    pub const SHARES_OUTSTANDING: &[&str] = &[
        "CommonStockSharesOutstanding",
        "EntityCommonStockSharesOutstanding",
    ];
}
