//! Read-mostly reports over the ledger: accounts, envelopes, spending and recurring bills.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::{
    core::services::{EnvelopeService, RecurringRun, RecurringService, TransactionService},
    ledger::{Account, Ledger},
};

use super::{account_name, envelope_name, output, Money};

const UPCOMING_LIMIT: usize = 5;

pub(super) fn accounts(ledger: &Ledger, today: NaiveDate, money: &Money) {
    output::section("Accounts");
    for account in &ledger.accounts {
        let activity = TransactionService::for_account(ledger, account.id).len();
        output::info(format!(
            "{} ({}): {} across {activity} transactions",
            account.name,
            account.category.label(),
            money.format(account.balance)
        ));
        for detail in account_details(account, today, money) {
            output::info(format!("    {detail}"));
        }
    }
}

fn account_details(account: &Account, today: NaiveDate, money: &Money) -> Vec<String> {
    let mut details = Vec::new();
    if let Some(utilization) = account.credit_utilization() {
        details.push(format!("utilization {:.1}%", utilization * 100.0));
    }
    if let Some(progress) = account.payoff_progress() {
        details.push(format!("paid off {:.1}%", progress * 100.0));
    }
    if let Some(date) = account.last_payment_date() {
        details.push(format!("last payment {date}"));
    }
    if account.tracks_contributions() {
        details.push(format!(
            "contributed {} in {}, net {}",
            money.format(account.contributions_in_year(today.year())),
            today.year(),
            money.format(account.net_contributions())
        ));
        if let Some(room) = account.remaining_contribution_room() {
            details.push(format!("room left {}", money.format(room)));
        }
    }
    details
}

pub(super) fn envelopes(ledger: &Ledger, money: &Money) {
    output::section("Envelopes");
    for envelope in &ledger.envelopes {
        let funded = envelope
            .funded_ratio()
            .map(|ratio| format!(", {:.0}% funded", ratio * 100.0))
            .unwrap_or_default();
        let activity = TransactionService::for_envelope(ledger, envelope.id).len();
        output::info(format!(
            "{}: {} available, {} spent{funded} ({activity} transactions)",
            envelope.name,
            money.format(envelope.balance),
            money.format(envelope.spent)
        ));
    }
    output::info(format!(
        "Monthly targets: {}",
        money.format(EnvelopeService::monthly_target_total(ledger))
    ));
    for overdraft in EnvelopeService::overdrawn(ledger) {
        output::warning(format!(
            "{} is overdrawn by {}",
            envelope_name(ledger, overdraft.envelope_id),
            money.format(overdraft.overdraft)
        ));
    }
}

pub(super) fn spending(
    ledger: &Ledger,
    category_id: Uuid,
    range: Option<(NaiveDate, NaiveDate)>,
    month: NaiveDate,
    money: &Money,
) {
    let (label, total) = match range {
        Some((from, to)) => (
            format!("{from} to {to}"),
            TransactionService::category_spending(ledger, category_id, from, to),
        ),
        None => (
            month.format("%B %Y").to_string(),
            TransactionService::monthly_category_spending(ledger, category_id, month),
        ),
    };
    output::info(format!(
        "Category {category_id} spent {} in {label}",
        money.format(total)
    ));
}

pub(super) fn recurring(ledger: &Ledger, runs: &[RecurringRun], money: &Money) {
    output::section("Recurring");
    for run in runs {
        let name = ledger
            .recurring_template(run.template_id)
            .map(|template| template.name.clone())
            .unwrap_or_else(|| run.template_id.to_string());
        output::success(format!("Recorded {name} for {}", run.date));
        if let Some(overdraft) = &run.report.overdraft {
            output::warning(format!(
                "Envelope {} is overdrawn by {}",
                envelope_name(ledger, overdraft.envelope_id),
                money.format(overdraft.overdraft)
            ));
        }
        for skipped in &run.report.unresolved {
            output::warning(format!("Skipped {:?} reference {}", skipped.slot, skipped.id));
        }
    }

    let totals = RecurringService::monthly_totals(ledger);
    output::info(format!("Monthly income:   {}", money.format(totals.income)));
    output::info(format!("Monthly outgoing: {}", money.format(totals.outgoing)));
    output::info(format!("Monthly net:      {}", money.format(totals.net())));
    for (date, template) in RecurringService::upcoming(ledger, UPCOMING_LIMIT) {
        let target = template
            .kind
            .to_account()
            .or_else(|| template.kind.from_account())
            .map(|id| account_name(ledger, id))
            .unwrap_or_else(|| "cash".to_string());
        output::info(format!(
            "Next {} on {date}: {} ({}, {target})",
            template.name,
            money.format(template.amount),
            template.frequency
        ));
    }
}
