use anyhow::Result;
use chama_core::constants::TRANSACTIONS_PER_PAGE;
use chama_core::views::{
    ContributionForm, GroupStatsView, GroupTransactionsView, MpesaContributionForm,
};
use chama_core::AppContext;
use clap::Args;

use super::ready;
use crate::formatting::PrintFormatted;

#[derive(Args, Debug)]
pub struct Contribute {
    pub group: i64,
    pub amount: String,
    #[arg(long, default_value = "")]
    pub description: String,
}

impl Contribute {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        let mut form = ContributionForm::new(ctx, self.group);
        form.amount = self.amount;
        form.description = self.description;
        form.submit().await?;
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct Mpesa {
    pub group: i64,
    pub amount: String,
    /// Phone number, local (07...) or international (2547...)
    pub phone: String,
}

impl Mpesa {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        let mut form = MpesaContributionForm::new(ctx, self.group);
        form.amount = self.amount;
        form.phone_number = self.phone;
        let receipt = form.submit().await?;
        if let Some(id) = receipt.checkout_request_id {
            println!("Checkout request: {}", id);
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct Transactions {
    /// Group id; without it your own history is shown
    pub group: Option<i64>,
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = TRANSACTIONS_PER_PAGE)]
    pub per_page: u32,
}

impl Transactions {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        match self.group {
            Some(group_id) => {
                let mut view = GroupTransactionsView::new(ctx, group_id);
                view.page = self.page.max(1);
                view.per_page = self.per_page;
                view.load().await;
                ready(&view.state)?.print_formatted();
                if view.has_next_page() {
                    println!("More: --page {}", view.page + 1);
                }
            }
            None => {
                let page = ctx
                    .services
                    .transactions
                    .get_user_transactions(self.page.max(1), self.per_page)
                    .await?;
                page.print_formatted();
            }
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct Stats {
    pub group: i64,
}

impl Stats {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        let mut view = GroupStatsView::new(ctx, self.group);
        view.load().await;
        ready(&view.state)?.print_formatted();
        Ok(())
    }
}
