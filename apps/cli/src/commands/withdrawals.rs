use anyhow::{anyhow, Result};
use chama_core::utils::money::format_amount;
use chama_core::views::{
    AdminDashboard, MemberDashboard, PendingWithdrawalsView, ProcessWithdrawalForm,
    WithdrawalListView, WithdrawalRequestForm,
};
use chama_core::withdrawals::WithdrawalDecision;
use chama_core::AppContext;
use clap::{Args, Subcommand};

use super::ready;
use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Withdrawals {
    /// Ask to withdraw from your savings in a group
    Request(RequestWithdrawal),
    /// Show your available balance and pending requests in a group
    Balance(GroupArg),
    /// List all of your withdrawal requests
    Mine,
    /// List pending requests of a group (admin)
    Pending(GroupArg),
    /// List every request of a group (admin)
    History(GroupArg),
    /// Approve a pending request (admin)
    Approve(Decide),
    /// Reject a pending request (admin)
    Reject(Decide),
    /// Show the status of one request
    Status(WithdrawalId),
}

#[derive(Args, Debug)]
pub struct GroupArg {
    pub group: i64,
}

#[derive(Args, Debug)]
pub struct WithdrawalId {
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct RequestWithdrawal {
    pub group: i64,
    pub amount: String,
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug)]
pub struct Decide {
    pub id: i64,
    #[arg(long, default_value = "")]
    pub comment: String,
}

impl Withdrawals {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        match self {
            Withdrawals::Request(cmd) => {
                let mut form = WithdrawalRequestForm::new(ctx, cmd.group);
                form.load().await;
                if let Some(error) = form.error.take() {
                    return Err(anyhow!(error));
                }
                form.amount = cmd.amount;
                form.description = cmd.description;
                form.submit().await?;
                println!("Available now: {}", format_amount(form.available_balance));
                Ok(())
            }
            Withdrawals::Balance(args) => {
                let mut view = MemberDashboard::new(ctx, args.group);
                view.load().await;
                let data = ready(&view.state)?;
                println!("Available balance:\t{}", format_amount(data.available_balance));
                println!("{}", data.pending_label());
                for w in data.recent_pending() {
                    w.print_formatted();
                }
                if data.more_pending() > 0 {
                    println!("... and {} more", data.more_pending());
                }
                Ok(())
            }
            Withdrawals::Mine => {
                let mut view = WithdrawalListView::new(ctx);
                view.load().await;
                let requests = ready(&view.state)?;
                if requests.is_empty() {
                    println!("No withdrawal requests");
                }
                for w in requests {
                    w.print_formatted();
                }
                Ok(())
            }
            Withdrawals::Pending(args) => {
                let view = PendingWithdrawalsView::new(ctx, args.group);
                view.load().await;
                let state = view.state();
                let pending = ready(&state)?;
                if pending.is_empty() {
                    println!("No pending withdrawal requests");
                }
                for w in pending {
                    w.print_formatted();
                }
                Ok(())
            }
            Withdrawals::History(args) => {
                let mut view = AdminDashboard::new(ctx, args.group);
                view.load().await;
                let data = ready(&view.state)?;
                println!("{} pending", data.pending.len());
                for w in &data.all {
                    w.print_formatted();
                }
                Ok(())
            }
            Withdrawals::Approve(cmd) => decide(ctx, cmd, WithdrawalDecision::Approved).await,
            Withdrawals::Reject(cmd) => decide(ctx, cmd, WithdrawalDecision::Rejected).await,
            Withdrawals::Status(cmd) => {
                let withdrawal = ctx
                    .services
                    .withdrawals
                    .get_withdrawal_status(cmd.id)
                    .await?;
                withdrawal.print_formatted();
                Ok(())
            }
        }
    }
}

async fn decide(ctx: &AppContext, cmd: Decide, decision: WithdrawalDecision) -> Result<()> {
    let mut form = ProcessWithdrawalForm::new(ctx, cmd.id);
    form.comment = cmd.comment;
    let status = form.process(decision).await?;
    println!("Withdrawal #{} is now {}", cmd.id, status);
    Ok(())
}
