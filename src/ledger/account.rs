use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::history::{ContributionEntry, HistoryLog, PaymentEntry, WithdrawalEntry};

/// Represents an asset or liability tracked within the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    pub category: AccountCategory,
    /// Assets rise with inflows; liabilities rise with new debt.
    pub balance: f64,
    #[serde(default, flatten)]
    pub terms: DebtTerms,
    /// Present only on accounts that track a yearly contribution total.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ytd_contribution: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_contribution_limit: Option<f64>,
    #[serde(default)]
    pub contributions: HistoryLog<ContributionEntry>,
    #[serde(default)]
    pub payments: HistoryLog<PaymentEntry>,
    #[serde(default)]
    pub withdrawals: HistoryLog<WithdrawalEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Optional borrowing terms carried by liabilities.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DebtTerms {
    /// Annual percentage rate, e.g. `22.99`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_payment: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<f64>,
}

impl Account {
    pub fn new(name: impl Into<String>, category: AccountCategory, balance: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: category.kind(),
            category,
            balance,
            terms: DebtTerms::default(),
            ytd_contribution: None,
            annual_contribution_limit: None,
            contributions: HistoryLog::new(),
            payments: HistoryLog::new(),
            withdrawals: HistoryLog::new(),
            notes: None,
        }
    }

    /// Attaches borrowing terms, recording the starting balance as the original amount.
    pub fn with_terms(mut self, interest_rate: f64, min_payment: f64) -> Self {
        self.terms.interest_rate = Some(interest_rate);
        self.terms.min_payment = Some(min_payment);
        self.terms.original_amount.get_or_insert(self.balance);
        self
    }

    pub fn with_credit_limit(mut self, limit: f64) -> Self {
        self.terms.credit_limit = Some(limit);
        self
    }

    /// Enables yearly contribution tracking, optionally against a cap.
    pub fn with_contribution_tracking(mut self, annual_limit: Option<f64>) -> Self {
        self.ytd_contribution = Some(0.0);
        self.annual_contribution_limit = annual_limit;
        self
    }

    pub fn tracks_contributions(&self) -> bool {
        self.ytd_contribution.is_some()
    }

    pub fn is_asset(&self) -> bool {
        self.kind == AccountKind::Asset
    }

    pub fn is_liability(&self) -> bool {
        self.kind == AccountKind::Liability
    }

    /// Annual rate with a missing value treated as zero.
    pub fn interest_rate(&self) -> f64 {
        self.terms.interest_rate.unwrap_or(0.0)
    }

    pub fn min_payment(&self) -> f64 {
        self.terms.min_payment.unwrap_or(0.0)
    }

    pub fn monthly_rate(&self) -> f64 {
        self.interest_rate() / 100.0 / 12.0
    }

    pub fn monthly_interest(&self) -> f64 {
        self.balance * self.monthly_rate()
    }

    pub fn credit_utilization(&self) -> Option<f64> {
        match self.terms.credit_limit {
            Some(limit) if limit > 0.0 => Some(self.balance / limit),
            _ => None,
        }
    }

    /// Share of the original debt already repaid, in `0.0..=1.0`.
    pub fn payoff_progress(&self) -> Option<f64> {
        match self.terms.original_amount {
            Some(original) if original > 0.0 => {
                Some(((original - self.balance) / original).clamp(0.0, 1.0))
            }
            _ => None,
        }
    }

    pub fn contributions_in_year(&self, year: i32) -> f64 {
        match (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) {
            (Some(start), Some(end)) => self.contributions.total_between(start, end),
            _ => 0.0,
        }
    }

    pub fn remaining_contribution_room(&self) -> Option<f64> {
        let limit = self.annual_contribution_limit?;
        Some((limit - self.ytd_contribution.unwrap_or(0.0)).max(0.0))
    }

    pub fn net_contributions(&self) -> f64 {
        self.contributions.total() - self.withdrawals.total()
    }

    /// Date of the most recent payment; same-day payments resolve to the last recorded.
    pub fn last_payment_date(&self) -> Option<NaiveDate> {
        self.payments.entries().last().map(|(_, entry)| entry.date)
    }
}

/// Enumerates the two sides of the balance sheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Asset,
    Liability,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AccountCategory {
    Checking,
    Savings,
    Cash,
    Investments,
    Retirement,
    Property,
    Vehicles,
    OtherAsset,
    CreditCard,
    AutoLoan,
    StudentLoan,
    PersonalLoan,
    Mortgage,
    OtherLiability,
}

impl AccountCategory {
    /// The balance-sheet side this category naturally belongs to.
    pub fn kind(&self) -> AccountKind {
        match self {
            AccountCategory::Checking
            | AccountCategory::Savings
            | AccountCategory::Cash
            | AccountCategory::Investments
            | AccountCategory::Retirement
            | AccountCategory::Property
            | AccountCategory::Vehicles
            | AccountCategory::OtherAsset => AccountKind::Asset,
            AccountCategory::CreditCard
            | AccountCategory::AutoLoan
            | AccountCategory::StudentLoan
            | AccountCategory::PersonalLoan
            | AccountCategory::Mortgage
            | AccountCategory::OtherLiability => AccountKind::Liability,
        }
    }

    /// Revolving credit: payments are treated as pure principal.
    pub fn is_revolving(&self) -> bool {
        matches!(self, AccountCategory::CreditCard)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountCategory::Checking => "Checking",
            AccountCategory::Savings => "Savings",
            AccountCategory::Cash => "Cash & Bank",
            AccountCategory::Investments => "Investments",
            AccountCategory::Retirement => "Retirement",
            AccountCategory::Property => "Property",
            AccountCategory::Vehicles => "Vehicles",
            AccountCategory::OtherAsset | AccountCategory::OtherLiability => "Other",
            AccountCategory::CreditCard => "Credit Card",
            AccountCategory::AutoLoan => "Auto Loan",
            AccountCategory::StudentLoan => "Student Loan",
            AccountCategory::PersonalLoan => "Personal Loan",
            AccountCategory::Mortgage => "Mortgage",
        }
    }
}
