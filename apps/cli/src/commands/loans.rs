use anyhow::{bail, Result};
use chama_core::constants::DEFAULT_LOAN_DURATION_WEEKS;
use chama_core::utils::money::format_amount;
use chama_core::views::{
    LoanAdminActions, LoanDetailsView, LoanListMode, LoanListView, LoanRequestForm,
    LoanSettingsCard, LoanSettingsField, LoanTab,
};
use chama_core::AppContext;
use clap::{Args, Subcommand, ValueEnum};

use super::ready;
use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Loans {
    /// How much you can borrow from a group
    Eligibility(GroupArg),
    /// Ask a group for a loan
    Request(RequestLoan),
    /// List your loans, or a group's loans with --group
    List(ListLoans),
    /// Show one loan with its repayment schedule
    Show(LoanId),
    /// Repay part of an active loan
    Repay(Repay),
    /// Approve a pending loan (admin)
    Approve(LoanId),
    /// Reject a pending loan (admin)
    Reject(Reject),
    /// Show a group's lending rules
    Settings(GroupArg),
    /// Change a group's lending rules (admin)
    SetSettings(SetSettings),
}

#[derive(Args, Debug)]
pub struct GroupArg {
    pub group: i64,
}

#[derive(Args, Debug)]
pub struct LoanId {
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct RequestLoan {
    pub group: i64,
    pub amount: String,
    #[arg(long, default_value_t = DEFAULT_LOAN_DURATION_WEEKS)]
    pub weeks: u32,
    #[arg(long, default_value = "")]
    pub purpose: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TabArg {
    Active,
    Pending,
    Paid,
}

impl From<TabArg> for LoanTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Active => LoanTab::Active,
            TabArg::Pending => LoanTab::Pending,
            TabArg::Paid => LoanTab::Paid,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListLoans {
    #[arg(long)]
    pub group: Option<i64>,
    #[arg(long, value_enum, default_value_t = TabArg::Active)]
    pub tab: TabArg,
}

#[derive(Args, Debug)]
pub struct Repay {
    pub id: i64,
    pub amount: String,
}

#[derive(Args, Debug)]
pub struct Reject {
    pub id: i64,
    pub reason: String,
}

#[derive(Args, Debug)]
pub struct SetSettings {
    pub group: i64,
    #[arg(long)]
    pub max_multiplier: Option<String>,
    #[arg(long)]
    pub interest_rate: Option<String>,
    #[arg(long)]
    pub min_weeks: Option<String>,
    #[arg(long)]
    pub max_weeks: Option<String>,
    #[arg(long)]
    pub penalty_rate: Option<String>,
}

impl SetSettings {
    fn changes(&self) -> Vec<(LoanSettingsField, &str)> {
        [
            (LoanSettingsField::MaxLoanMultiplier, &self.max_multiplier),
            (LoanSettingsField::BaseInterestRate, &self.interest_rate),
            (LoanSettingsField::MinRepaymentPeriod, &self.min_weeks),
            (LoanSettingsField::MaxRepaymentPeriod, &self.max_weeks),
            (LoanSettingsField::LatePenaltyRate, &self.penalty_rate),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

impl Loans {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        match self {
            Loans::Eligibility(args) => {
                let mut form = LoanRequestForm::new(ctx, args.group);
                form.check_eligibility().await?.print_formatted();
                Ok(())
            }
            Loans::Request(cmd) => {
                let mut form = LoanRequestForm::new(ctx, cmd.group);
                form.check_eligibility().await?;
                println!("{}", form.eligibility_label());
                form.amount = cmd.amount;
                form.duration_weeks = cmd.weeks;
                form.purpose = cmd.purpose;
                form.submit().await?;
                Ok(())
            }
            Loans::List(cmd) => {
                let mode = match cmd.group {
                    Some(group_id) => LoanListMode::Group(group_id),
                    None => LoanListMode::User,
                };
                let mut view = LoanListView::new(ctx, mode);
                view.select_tab(cmd.tab.into()).await;
                println!("{}", view.title());
                let loans = ready(&view.state)?;
                if loans.is_empty() {
                    println!("{}", view.tab.empty_message());
                }
                for loan in loans {
                    println!(
                        "#{}\t{}\t{}\t{}\toutstanding {}",
                        loan.id,
                        view.counterpart(loan),
                        format_amount(loan.amount),
                        loan.status,
                        format_amount(loan.outstanding_balance)
                    );
                }
                Ok(())
            }
            Loans::Show(cmd) => {
                let mut view = LoanDetailsView::new(ctx, cmd.id);
                view.load().await;
                ready(&view.state)?.print_formatted();
                Ok(())
            }
            Loans::Repay(cmd) => {
                let mut view = LoanDetailsView::new(ctx, cmd.id);
                view.load().await;
                ready(&view.state)?;
                view.repayment_amount = cmd.amount;
                view.repay().await?;
                if let Some(loan) = view.state.data() {
                    println!("Outstanding:\t{}", format_amount(loan.outstanding_balance));
                }
                Ok(())
            }
            Loans::Approve(cmd) => {
                let status = LoanAdminActions::new(ctx, cmd.id).approve().await?;
                println!("Loan #{} is now {}", cmd.id, status);
                Ok(())
            }
            Loans::Reject(cmd) => {
                let mut actions = LoanAdminActions::new(ctx, cmd.id);
                actions.rejection_reason = cmd.reason;
                let status = actions.reject().await?;
                println!("Loan #{} is now {}", cmd.id, status);
                Ok(())
            }
            Loans::Settings(args) => {
                let mut card = LoanSettingsCard::new(ctx, args.group);
                card.load().await;
                card.settings.print_formatted();
                Ok(())
            }
            Loans::SetSettings(cmd) => {
                let changes = cmd.changes();
                if changes.is_empty() {
                    bail!("Nothing to update: pass at least one setting");
                }
                let mut card = LoanSettingsCard::new(ctx, cmd.group);
                card.load().await;
                card.edit();
                for (field, value) in changes {
                    card.set_field(field, value);
                }
                card.save().await?;
                card.settings.print_formatted();
                Ok(())
            }
        }
    }
}
