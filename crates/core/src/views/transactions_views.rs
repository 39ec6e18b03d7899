//! Contribution forms and the transaction/stat panels of a group.

use std::sync::Arc;

use log::info;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::constants::TRANSACTIONS_PER_PAGE;
use crate::context::AppContext;
use crate::errors::{Result, ValidationError};
use crate::events::{UiEvent, UiEventSink};
use crate::transactions::{
    normalize_mpesa_phone, ContributionReceipt, GroupStats, MpesaContribution, MpesaReceipt,
    NewContribution, TransactionPage, TransactionServiceTrait,
};
use crate::utils::money::parse_amount;
use crate::views::ViewState;

const MIN_CONTRIBUTION: Decimal = dec!(0.01);
const MIN_MPESA_CONTRIBUTION: Decimal = Decimal::ONE;

/// Paged contribution/withdrawal history of one group.
pub struct GroupTransactionsView {
    pub group_id: i64,
    transactions: Arc<dyn TransactionServiceTrait>,
    pub page: u32,
    pub per_page: u32,
    pub state: ViewState<TransactionPage>,
}

impl GroupTransactionsView {
    pub fn new(ctx: &AppContext, group_id: i64) -> Self {
        Self {
            group_id,
            transactions: ctx.services.transactions.clone(),
            page: 1,
            per_page: TRANSACTIONS_PER_PAGE,
            state: ViewState::Loading,
        }
    }

    pub async fn load(&mut self) {
        self.state = ViewState::from_result(
            self.transactions
                .get_group_transactions(self.group_id, self.page, self.per_page)
                .await,
        );
    }

    pub fn has_next_page(&self) -> bool {
        match self.state.data() {
            Some(TransactionPage {
                pages: Some(pages), ..
            }) => self.page < *pages,
            Some(page) => page.transactions.len() as u32 >= self.per_page,
            None => false,
        }
    }

    pub async fn next_page(&mut self) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.page += 1;
        self.load().await;
        true
    }

    pub async fn previous_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        self.load().await;
        true
    }
}

pub struct GroupStatsView {
    pub group_id: i64,
    transactions: Arc<dyn TransactionServiceTrait>,
    pub state: ViewState<GroupStats>,
}

impl GroupStatsView {
    pub fn new(ctx: &AppContext, group_id: i64) -> Self {
        Self {
            group_id,
            transactions: ctx.services.transactions.clone(),
            state: ViewState::Loading,
        }
    }

    pub async fn load(&mut self) {
        self.state = ViewState::from_result(self.transactions.get_group_stats(self.group_id).await);
    }
}

/// Manual contribution entry.
pub struct ContributionForm {
    pub group_id: i64,
    transactions: Arc<dyn TransactionServiceTrait>,
    events: Arc<dyn UiEventSink>,
    pub amount: String,
    pub description: String,
    pub error: Option<String>,
    pub success: bool,
}

impl ContributionForm {
    pub fn new(ctx: &AppContext, group_id: i64) -> Self {
        Self {
            group_id,
            transactions: ctx.services.transactions.clone(),
            events: ctx.events.clone(),
            amount: String::new(),
            description: String::new(),
            error: None,
            success: false,
        }
    }

    fn payload(&self) -> Result<NewContribution> {
        let amount = parse_amount(&self.amount)?;
        if amount < MIN_CONTRIBUTION {
            return Err(ValidationError::InvalidAmount(format!(
                "minimum contribution is {}",
                MIN_CONTRIBUTION
            ))
            .into());
        }
        Ok(NewContribution {
            group_id: self.group_id,
            amount,
            description: self.description.clone(),
        })
    }

    pub fn can_submit(&self) -> bool {
        self.payload().is_ok()
    }

    /// Sends one contribution; success clears the fields.
    pub async fn submit(&mut self) -> Result<ContributionReceipt> {
        self.error = None;
        self.success = false;
        let result = match self.payload() {
            Ok(payload) => self.transactions.contribute(payload).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(receipt) => {
                info!("Contribution recorded for group {}", self.group_id);
                self.success = true;
                self.amount.clear();
                self.description.clear();
                self.events.emit(UiEvent::success(
                    receipt
                        .message
                        .clone()
                        .unwrap_or_else(|| "Contribution successful".to_string()),
                ));
                Ok(receipt)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

/// Mobile-money contribution: the server pushes a payment prompt to the
/// member's phone.
pub struct MpesaContributionForm {
    pub group_id: i64,
    transactions: Arc<dyn TransactionServiceTrait>,
    events: Arc<dyn UiEventSink>,
    pub amount: String,
    /// Local number as typed, e.g. `712345678`.
    pub phone_number: String,
    pub error: Option<String>,
    pub receipt: Option<MpesaReceipt>,
}

impl MpesaContributionForm {
    pub fn new(ctx: &AppContext, group_id: i64) -> Self {
        Self {
            group_id,
            transactions: ctx.services.transactions.clone(),
            events: ctx.events.clone(),
            amount: String::new(),
            phone_number: String::new(),
            error: None,
            receipt: None,
        }
    }

    fn payload(&self) -> Result<MpesaContribution> {
        let amount = parse_amount(&self.amount)?;
        if amount < MIN_MPESA_CONTRIBUTION {
            return Err(ValidationError::InvalidAmount(format!(
                "minimum M-Pesa contribution is {}",
                MIN_MPESA_CONTRIBUTION
            ))
            .into());
        }
        Ok(MpesaContribution {
            amount,
            phone_number: normalize_mpesa_phone(&self.phone_number)?,
        })
    }

    pub async fn submit(&mut self) -> Result<MpesaReceipt> {
        self.error = None;
        let result = match self.payload() {
            Ok(payload) => {
                self.transactions
                    .initiate_mpesa_contribution(self.group_id, payload)
                    .await
            }
            Err(e) => Err(e),
        };
        match result {
            Ok(receipt) => {
                self.events.emit(UiEvent::info(
                    "Payment request sent to your phone. Please complete the transaction on your mobile device.",
                ));
                self.receipt = Some(receipt.clone());
                Ok(receipt)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn is_sent(&self) -> bool {
        self.receipt.is_some()
    }
}
