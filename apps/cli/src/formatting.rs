use chama_core::auth::User;
use chama_core::groups::{Group, GroupMember};
use chama_core::loans::{Loan, LoanEligibility, LoanSettings};
use chama_core::notifications::Notification;
use chama_core::transactions::{GroupStats, Transaction, TransactionPage};
use chama_core::utils::money::format_amount;
use chama_core::utils::time_utils::{display_date, display_time_ago};
use chama_core::views::GroupSummary;
use chama_core::withdrawals::Withdrawal;
use chrono::Utc;

pub trait PrintFormatted {
    fn formatted(&self) -> String;

    fn print_formatted(&self) {
        println!("{}", self.formatted());
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

fn date(value: Option<&str>) -> String {
    value.map(display_date).unwrap_or_else(|| "-".to_string())
}

impl PrintFormatted for User {
    fn formatted(&self) -> String {
        format!("#{}\t{}\t{}", self.id, self.username, self.email)
    }
}

impl PrintFormatted for Group {
    fn formatted(&self) -> String {
        let mut out = format!(
            "Group #{}: {}\n{}\nSaved:\t\t{} of {} ({}%)",
            self.id,
            self.name,
            self.description_or_default(),
            format_amount(self.current_amount),
            format_amount(self.target_amount),
            self.progress_percent()
        );
        if let Some(status) = self.member_status {
            out.push_str(&format!("\nMembership:\t{}", status));
        }
        out
    }
}

impl PrintFormatted for GroupSummary {
    fn formatted(&self) -> String {
        let badge = if self.shows_admin_badge() { " [admin]" } else { "" };
        let mut out = format!(
            "#{}\t{}{}\t{} / {} ({}%)",
            self.group.id,
            self.group.name,
            badge,
            format_amount(self.group.current_amount),
            format_amount(self.group.target_amount),
            self.progress_percent()
        );
        if self.loan_stats.active_loans > 0 || self.loan_stats.pending_loans > 0 {
            out.push_str(&format!(
                "\tloans: {} active, {} pending, {} outstanding",
                self.loan_stats.active_loans,
                self.loan_stats.pending_loans,
                format_amount(self.loan_stats.outstanding_balance)
            ));
        }
        out
    }
}

impl PrintFormatted for GroupMember {
    fn formatted(&self) -> String {
        let role = if self.is_admin { "admin" } else { "member" };
        format!("#{}\t{}\t{}\t{}", self.id, self.username, self.email, role)
    }
}

impl PrintFormatted for Transaction {
    fn formatted(&self) -> String {
        format!(
            "{}\t{}\t{}{}\t{}\t{}",
            date(self.timestamp.as_deref()),
            self.transaction_type,
            self.transaction_type.sign(),
            format_amount(self.amount),
            or_dash(self.user_username.as_deref()),
            or_dash(self.description.as_deref())
        )
    }
}

impl PrintFormatted for TransactionPage {
    fn formatted(&self) -> String {
        if self.transactions.is_empty() {
            return "No transactions yet".to_string();
        }
        let mut lines: Vec<String> = self.transactions.iter().map(|t| t.formatted()).collect();
        if let (Some(current), Some(pages)) = (self.current_page, self.pages) {
            lines.push(format!("Page {} of {}", current, pages));
        }
        lines.join("\n")
    }
}

impl PrintFormatted for GroupStats {
    fn formatted(&self) -> String {
        let mut out = format!(
            "Current balance:\t{}\nContributions:\t\t{}\nWithdrawals:\t\t{}",
            format_amount(self.current_amount),
            format_amount(self.total_contributions),
            format_amount(self.total_withdrawals)
        );
        if !self.top_contributors.is_empty() {
            out.push_str("\nTop contributors:");
            for (rank, c) in self.top_contributors.iter().enumerate() {
                out.push_str(&format!(
                    "\n  {}. {}\t{}",
                    rank + 1,
                    c.username,
                    format_amount(c.amount)
                ));
            }
        }
        out
    }
}

impl PrintFormatted for Withdrawal {
    fn formatted(&self) -> String {
        let mut out = format!(
            "#{}\t{}\t{}\t{}\t{}",
            self.id,
            date(self.timestamp.as_deref()),
            format_amount(self.amount),
            self.status,
            or_dash(self.user_username.as_deref())
        );
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("\t{}", description));
        }
        if let Some(comment) = self.admin_comment.as_deref().filter(|c| !c.is_empty()) {
            out.push_str(&format!("\t(admin: {})", comment));
        }
        out
    }
}

impl PrintFormatted for Loan {
    fn formatted(&self) -> String {
        let mut out = format!(
            "Loan #{}\t{}\t{}\nInterest:\t{}%\nTo repay:\t{}\nPaid:\t\t{}\nOutstanding:\t{}\nDue:\t\t{}",
            self.id,
            format_amount(self.amount),
            self.status,
            self.interest_rate,
            format_amount(self.total_repayment),
            format_amount(self.amount_paid),
            format_amount(self.outstanding_balance),
            date(self.due_date.as_deref())
        );
        if let Some(purpose) = self.purpose.as_deref() {
            out.push_str(&format!("\nPurpose:\t{}", purpose));
        }
        if !self.repayments.is_empty() {
            out.push_str("\nSchedule:");
            for r in &self.repayments {
                let overdue = if r.is_overdue { " OVERDUE" } else { "" };
                out.push_str(&format!(
                    "\n  {}\t{}\t{}{}",
                    date(r.due_date.as_deref()),
                    format_amount(r.amount),
                    r.status,
                    overdue
                ));
            }
        }
        out
    }
}

impl PrintFormatted for LoanEligibility {
    fn formatted(&self) -> String {
        let (min, max) = self.repayment_bounds();
        let mut out = format!(
            "Eligible amount:\t{}\nDuration:\t\t{}-{} weeks",
            format_amount(self.eligible_amount),
            min,
            max
        );
        if let Some(message) = self.message.as_deref() {
            out.push_str(&format!("\n{}", message));
        }
        out
    }
}

impl PrintFormatted for LoanSettings {
    fn formatted(&self) -> String {
        format!(
            "Max loan multiplier:\t{}x\nBase interest rate:\t{}%\nRepayment period:\t{}-{} weeks\nLate penalty rate:\t{}%",
            self.max_loan_multiplier,
            self.base_interest_rate,
            self.min_repayment_period,
            self.max_repayment_period,
            self.late_penalty_rate
        )
    }
}

impl PrintFormatted for Notification {
    fn formatted(&self) -> String {
        let marker = if self.read { " " } else { "*" };
        let when = self
            .created_at
            .as_deref()
            .map(|raw| display_time_ago(raw, Utc::now()))
            .unwrap_or_default();
        format!(
            "{} #{}\t{} {}\t{}",
            marker,
            self.id,
            self.icon(),
            self.message,
            when
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chama_core::groups::MemberStatus;
    use chama_core::loans::LoanStats;
    use chama_core::withdrawals::WithdrawalStatus;
    use rust_decimal_macros::dec;

    fn group() -> Group {
        Group {
            id: 4,
            name: "Harambee".into(),
            description: None,
            current_amount: dec!(2500),
            target_amount: dec!(10000),
            member_status: Some(MemberStatus::Admin),
            creator_id: Some(1),
        }
    }

    #[test]
    fn group_shows_progress_and_fallback_description() {
        let out = group().formatted();
        assert!(out.contains("Group #4: Harambee"));
        assert!(out.contains("No description"));
        assert!(out.contains("(25%)"));
    }

    #[test]
    fn summary_mentions_loans_only_when_present() {
        let quiet = GroupSummary {
            group: group(),
            loan_stats: LoanStats::default(),
        };
        assert!(!quiet.formatted().contains("loans:"));
        assert!(quiet.formatted().contains("[admin]"));

        let busy = GroupSummary {
            group: group(),
            loan_stats: LoanStats {
                total_loans: 3,
                active_loans: 2,
                pending_loans: 1,
                outstanding_balance: dec!(1200),
            },
        };
        assert!(busy.formatted().contains("2 active, 1 pending"));
    }

    #[test]
    fn withdrawal_line_includes_admin_comment() {
        let w = Withdrawal {
            id: 9,
            amount: dec!(300),
            status: WithdrawalStatus::Rejected,
            admin_comment: Some("Insufficient savings".into()),
            description: Some("School fees".into()),
            timestamp: None,
            user_username: Some("baraka".into()),
            group_id: Some(4),
            group_name: None,
        };
        let out = w.formatted();
        assert!(out.contains("REJECTED"));
        assert!(out.contains("School fees"));
        assert!(out.contains("(admin: Insufficient savings)"));
    }

    #[test]
    fn empty_history_has_a_message() {
        assert_eq!(TransactionPage::default().formatted(), "No transactions yet");
    }
}
