use anyhow::Result;
use chama_core::AppContext;
use clap::{Parser, Subcommand};

use crate::commands::{
    Auth, Contribute, Groups, Loans, Members, Mpesa, Notifications, Stats, Transactions,
    Withdrawals,
};

#[derive(Parser, Debug)]
#[command(name = "chama", version, about = "Terminal client for chama savings groups")]
pub struct Cli {
    /// Base URL of the API (overrides CHAMA_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn init() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign up, sign in and manage your profile
    #[command(subcommand)]
    Auth(Auth),
    /// Browse, create, join and leave groups
    #[command(subcommand)]
    Groups(Groups),
    /// Manage group membership
    #[command(subcommand)]
    Members(Members),
    /// Record a contribution to a group
    Contribute(Contribute),
    /// Pay a contribution through an M-Pesa prompt
    Mpesa(Mpesa),
    /// Show transaction history
    Transactions(Transactions),
    /// Show group statistics
    Stats(Stats),
    /// Request and process withdrawals
    #[command(subcommand)]
    Withdrawals(Withdrawals),
    /// Request, review and repay loans
    #[command(subcommand)]
    Loans(Loans),
    /// Read your notifications
    #[command(subcommand)]
    Notifications(Notifications),
}

impl Command {
    /// Everything but signing in, signing up and signing out needs a stored
    /// session.
    pub fn requires_session(&self) -> bool {
        match self {
            Command::Auth(cmd) => cmd.requires_session(),
            _ => true,
        }
    }

    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        match self {
            Command::Auth(cmd) => cmd.run(ctx).await,
            Command::Groups(cmd) => cmd.run(ctx).await,
            Command::Members(cmd) => cmd.run(ctx).await,
            Command::Contribute(cmd) => cmd.run(ctx).await,
            Command::Mpesa(cmd) => cmd.run(ctx).await,
            Command::Transactions(cmd) => cmd.run(ctx).await,
            Command::Stats(cmd) => cmd.run(ctx).await,
            Command::Withdrawals(cmd) => cmd.run(ctx).await,
            Command::Loans(cmd) => cmd.run(ctx).await,
            Command::Notifications(cmd) => cmd.run(ctx).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Auth, Loans, Notifications, TabArg};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("chama").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn login_does_not_need_a_session() {
        let cli = parse(&["auth", "login", "--email", "a@b.c", "--password", "pw"]);
        assert!(!cli.command.requires_session());
        assert!(matches!(cli.command, Command::Auth(Auth::Login(_))));

        assert!(parse(&["auth", "whoami"]).command.requires_session());
        assert!(parse(&["groups", "list"]).command.requires_session());
    }

    #[test]
    fn api_url_is_global() {
        let cli = parse(&["groups", "show", "4", "--api-url", "http://api.test"]);
        assert_eq!(cli.api_url.as_deref(), Some("http://api.test"));
    }

    #[test]
    fn contribute_keeps_amount_as_typed() {
        let cli = parse(&["contribute", "3", "250.50", "--description", "March"]);
        match cli.command {
            Command::Contribute(cmd) => {
                assert_eq!(cmd.group, 3);
                assert_eq!(cmd.amount, "250.50");
                assert_eq!(cmd.description, "March");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn loan_list_defaults_to_active_tab() {
        match parse(&["loans", "list"]).command {
            Command::Loans(Loans::List(cmd)) => {
                assert!(cmd.group.is_none());
                assert_eq!(cmd.tab, TabArg::Active);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn notifications_watch_parses() {
        assert!(matches!(
            parse(&["notifications", "watch"]).command,
            Command::Notifications(Notifications::Watch)
        ));
    }

    #[test]
    fn loan_reject_requires_reason() {
        let result = Cli::try_parse_from(["chama", "loans", "reject", "7"]);
        assert!(result.is_err());
    }

    #[test]
    fn passwords_can_come_from_the_environment() {
        use clap::CommandFactory;
        let cli = Cli::command();
        let auth = cli.find_subcommand("auth").unwrap();
        let env_of = |sub: &str| {
            auth.find_subcommand(sub)
                .unwrap()
                .get_arguments()
                .find(|a| a.get_id() == "password")
                .and_then(|a| a.get_env())
                .map(|v| v.to_string_lossy().into_owned())
        };
        assert_eq!(env_of("login").as_deref(), Some("CHAMA_PASSWORD"));
        assert_eq!(env_of("profile").as_deref(), Some("CHAMA_NEW_PASSWORD"));
    }
}
