use anyhow::Result;
use chama_core::views::{GroupMembersView, ManageMembersView};
use chama_core::AppContext;
use clap::{Args, Subcommand};

use super::ready;
use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Members {
    /// List the members of a group
    List(GroupArg),
    /// Search users who are not yet members
    Search(SearchUsers),
    /// Add a user to a group
    Add(MemberArgs),
    /// Remove a member from a group
    Remove(MemberArgs),
    /// Make a member an administrator
    Promote(MemberArgs),
}

#[derive(Args, Debug)]
pub struct GroupArg {
    pub group: i64,
}

#[derive(Args, Debug)]
pub struct SearchUsers {
    pub group: i64,
    pub query: String,
}

#[derive(Args, Debug)]
pub struct MemberArgs {
    pub group: i64,
    pub user: i64,
}

impl Members {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        match self {
            Members::List(args) => {
                let mut view = GroupMembersView::new(ctx, args.group);
                view.load().await;
                let members = ready(&view.state)?;
                println!("{}", view.member_count_label());
                for member in members {
                    member.print_formatted();
                }
                Ok(())
            }
            Members::Search(args) => {
                let mut view = ManageMembersView::new(ctx, args.group);
                view.load().await;
                view.search_query = args.query;
                view.search().await?;
                if view.search_results.is_empty() {
                    println!("No users found");
                }
                for user in &view.search_results {
                    user.print_formatted();
                }
                Ok(())
            }
            Members::Add(args) => {
                let mut view = ManageMembersView::new(ctx, args.group);
                view.add_member(args.user).await?;
                Ok(())
            }
            Members::Remove(args) => {
                let mut view = ManageMembersView::new(ctx, args.group);
                view.remove_member(args.user).await?;
                Ok(())
            }
            Members::Promote(args) => {
                let mut view = ManageMembersView::new(ctx, args.group);
                view.promote(args.user).await?;
                Ok(())
            }
        }
    }
}
