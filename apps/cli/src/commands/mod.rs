mod auth;
mod contributions;
mod groups;
mod loans;
mod members;
mod notifications;
mod withdrawals;

pub use auth::Auth;
pub use contributions::{Contribute, Mpesa, Stats, Transactions};
pub use groups::Groups;
pub use loans::{Loans, TabArg};
pub use members::Members;
pub use notifications::Notifications;
pub use withdrawals::Withdrawals;

use anyhow::{anyhow, Result};
use chama_core::views::ViewState;

/// Data of a loaded view, or its error message.
pub(crate) fn ready<T>(state: &ViewState<T>) -> Result<&T> {
    match state {
        ViewState::Ready(data) => Ok(data),
        ViewState::Failed(message) => Err(anyhow!("{}", message)),
        ViewState::Loading => Err(anyhow!("Nothing was loaded")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_surfaces_view_errors() {
        let ok: ViewState<u32> = ViewState::Ready(3);
        assert_eq!(*ready(&ok).unwrap(), 3);

        let failed: ViewState<u32> = ViewState::Failed("Failed to fetch user groups".into());
        assert_eq!(
            ready(&failed).unwrap_err().to_string(),
            "Failed to fetch user groups"
        );
        assert!(ready(&ViewState::<u32>::Loading).is_err());
    }
}
