use anyhow::{bail, Result};
use chama_core::groups::GroupUpdate;
use chama_core::utils::money::parse_amount;
use chama_core::views::{GroupDetailsView, GroupDiscoveryView, GroupForm, GroupListView};
use chama_core::AppContext;
use clap::{Args, Subcommand};

use super::ready;
use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Groups {
    /// List the groups you belong to
    List,
    /// Show one group
    Show(GroupId),
    /// Create a new group
    Create(CreateGroup),
    /// Update a group you administer
    Update(UpdateGroup),
    /// List public groups you can join
    Discover,
    /// Join a public group
    Join(GroupId),
    /// Leave a group
    Leave(GroupId),
}

impl Groups {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        match self {
            Groups::List => list(ctx).await,
            Groups::Show(cmd) => show(ctx, cmd.id).await,
            Groups::Create(cmd) => cmd.run(ctx).await,
            Groups::Update(cmd) => cmd.run(ctx).await,
            Groups::Discover => discover(ctx).await,
            Groups::Join(cmd) => {
                let mut view = GroupDiscoveryView::new(ctx);
                view.join(cmd.id).await?;
                Ok(())
            }
            Groups::Leave(cmd) => {
                let mut view = GroupDetailsView::new(ctx, cmd.id);
                view.leave().await?;
                Ok(())
            }
        }
    }
}

#[derive(Args, Debug)]
pub struct GroupId {
    /// Group id
    pub id: i64,
}

async fn list(ctx: &AppContext) -> Result<()> {
    let mut view = GroupListView::new(ctx);
    view.load().await;
    let groups = ready(&view.state)?;
    if groups.is_empty() {
        println!("You are not a member of any groups yet");
    }
    for summary in groups {
        summary.print_formatted();
    }
    Ok(())
}

async fn show(ctx: &AppContext, id: i64) -> Result<()> {
    let mut view = GroupDetailsView::new(ctx, id);
    view.load().await;
    ready(&view.state)?.print_formatted();
    let tabs: Vec<String> = view
        .available_tabs()
        .iter()
        .map(|t| format!("{:?}", t).to_lowercase())
        .collect();
    println!("Sections:\t{}", tabs.join(", "));
    Ok(())
}

async fn discover(ctx: &AppContext) -> Result<()> {
    let mut view = GroupDiscoveryView::new(ctx);
    view.load().await;
    let groups = ready(&view.state)?;
    if groups.is_empty() {
        println!("No groups available to join");
    }
    for group in groups {
        println!(
            "#{}\t{}\t{}",
            group.id,
            group.name,
            group.description_or_default()
        );
    }
    Ok(())
}

#[derive(Args, Debug)]
pub struct CreateGroup {
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Savings target
    #[arg(long, default_value = "0")]
    pub target: String,
}

impl CreateGroup {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        let mut form = GroupForm::new(ctx);
        form.name = self.name;
        form.description = self.description;
        form.target_amount = self.target;
        let group = form.submit().await?;
        group.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct UpdateGroup {
    pub id: i64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub target: Option<String>,
}

impl UpdateGroup {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        let target_amount = self.target.as_deref().map(parse_amount).transpose()?;
        let update = GroupUpdate {
            name: self.name,
            description: self.description,
            target_amount,
        };
        if update.name.is_none() && update.description.is_none() && update.target_amount.is_none()
        {
            bail!("Nothing to update: pass --name, --description or --target");
        }
        let group = ctx.services.groups.update_group(self.id, update).await?;
        group.print_formatted();
        Ok(())
    }
}
