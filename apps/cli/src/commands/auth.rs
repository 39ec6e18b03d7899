use anyhow::{bail, Result};
use chama_core::auth::{Credentials, NewUser, ProfileUpdate};
use chama_core::AppContext;
use clap::{Args, Subcommand};

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Auth {
    /// Create an account and sign in
    Register(Register),
    /// Sign in and remember the session
    Login(Login),
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Change username, email or password
    Profile(Profile),
}

impl Auth {
    pub fn requires_session(&self) -> bool {
        matches!(self, Auth::Whoami | Auth::Profile(_))
    }

    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        match self {
            Auth::Register(cmd) => cmd.run(ctx).await,
            Auth::Login(cmd) => cmd.run(ctx).await,
            Auth::Logout => {
                ctx.session.logout();
                println!("Logged out");
                Ok(())
            }
            Auth::Whoami => {
                match ctx.session.current_user() {
                    Some(user) => user.print_formatted(),
                    None => println!("Not logged in"),
                }
                Ok(())
            }
            Auth::Profile(cmd) => cmd.run(ctx).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct Register {
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "CHAMA_PASSWORD", hide_env_values = true)]
    pub password: String,
}

impl Register {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        let user = ctx
            .session
            .register(NewUser {
                username: self.username,
                email: self.email,
                password: self.password,
            })
            .await?;
        println!("Welcome, {}!", user.username);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct Login {
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "CHAMA_PASSWORD", hide_env_values = true)]
    pub password: String,
}

impl Login {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        let user = ctx
            .session
            .login(Credentials {
                email: self.email,
                password: self.password,
            })
            .await?;
        println!("Logged in as {}", user.username);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct Profile {
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long, env = "CHAMA_NEW_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl Profile {
    pub async fn run(self, ctx: &AppContext) -> Result<()> {
        let update = ProfileUpdate {
            username: self.username,
            email: self.email,
            password: self.password,
        };
        if update.is_empty() {
            bail!("Nothing to update: pass --username, --email or --password");
        }
        let user = ctx.session.update_profile(update).await?;
        user.print_formatted();
        Ok(())
    }
}
