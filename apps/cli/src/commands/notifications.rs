use std::collections::HashSet;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chama_core::views::{NotificationFilter, NotificationsPage};
use chama_core::AppContext;
use clap::{Args, Subcommand};

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Notifications {
    /// List recent notifications
    List(ListNotifications),
    /// Mark a notification read and show where it leads
    Open(NotificationId),
    /// Mark every notification read
    ReadAll,
    /// Print the number of unread notifications
    Count,
    /// Keep polling and print notifications as they arrive
    Watch,
}

#[derive(Args, Debug)]
pub struct ListNotifications {
    /// Only unread notifications
    #[arg(long)]
    pub unread: bool,
}

#[derive(Args, Debug)]
pub struct NotificationId {
    pub id: i64,
}

impl Notifications {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        match self {
            Notifications::List(cmd) => {
                let mut page = NotificationsPage::new(ctx);
                if cmd.unread {
                    page.filter = NotificationFilter::Unread;
                }
                page.load().await?;
                let visible = page.visible();
                if visible.is_empty() {
                    println!("{}", page.empty_message());
                }
                for n in &visible {
                    n.print_formatted();
                }
                Ok(())
            }
            Notifications::Open(cmd) => {
                let page = NotificationsPage::new(ctx);
                page.load().await?;
                let notification = page
                    .visible()
                    .into_iter()
                    .find(|n| n.id == cmd.id)
                    .ok_or_else(|| anyhow!("Notification #{} not found", cmd.id))?;
                notification.print_formatted();
                let route = page.open(&notification).await;
                println!("Open: {}", route);
                Ok(())
            }
            Notifications::ReadAll => {
                let mut page = NotificationsPage::new(ctx);
                page.filter = NotificationFilter::Unread;
                page.load().await?;
                if !page.shows_mark_all() {
                    println!("{}", page.empty_message());
                    return Ok(());
                }
                if page.mark_all_as_read().await {
                    println!("All notifications marked as read");
                } else {
                    println!("Marked as read locally; the server could not be updated");
                }
                Ok(())
            }
            Notifications::Count => {
                let count = ctx.notifications.refresh_unread_count().await?;
                println!("{}", count);
                Ok(())
            }
            Notifications::Watch => watch(ctx).await,
        }
    }
}

async fn watch(ctx: &AppContext) -> Result<()> {
    let handle = ctx.notifications.spawn_polling();
    let mut seen: HashSet<i64> = HashSet::new();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    println!("Watching notifications, press Ctrl-C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                let feed = ctx.notifications.snapshot();
                // Oldest first so the terminal reads top to bottom.
                for n in feed.notifications.iter().rev() {
                    if seen.insert(n.id) && !n.read {
                        n.print_formatted();
                    }
                }
                if handle.is_finished() {
                    break;
                }
            }
        }
    }

    handle.shutdown();
    Ok(())
}
