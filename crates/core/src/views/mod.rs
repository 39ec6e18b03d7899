//! View models, one per screen or form.
//!
//! A view model owns the data it fetched and nothing else; two views showing
//! the same group each keep their own copy. Forms only validate what the user
//! typed and forward the payload, every business rule lives on the server.

mod groups_views;
mod loans_views;
mod notifications_page;
mod transactions_views;
mod withdrawals_views;

#[cfg(test)]
pub(crate) mod mock_api;

pub use groups_views::*;
pub use loans_views::*;
pub use notifications_page::*;
pub use transactions_views::*;
pub use withdrawals_views::*;

use crate::errors::Result;

/// Load state of a view's primary data.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Loading
    }
}

impl<T> ViewState<T> {
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(data) => ViewState::Ready(data),
            Err(e) => ViewState::Failed(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn view_state_from_result() {
        let ready: ViewState<u32> = ViewState::from_result(Ok(3));
        assert_eq!(ready.data(), Some(&3));
        assert!(ready.error().is_none());

        let failed: ViewState<u32> =
            ViewState::from_result(Err(Error::api(404, "Group not found")));
        assert_eq!(failed.error(), Some("Group not found"));
        assert!(failed.data().is_none());

        assert!(ViewState::<u32>::default().is_loading());
    }
}
