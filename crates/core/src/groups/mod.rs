//! Groups module - savings groups, memberships and the group service trait.

mod groups_model;
mod groups_traits;

pub use groups_model::{Group, GroupMember, GroupUpdate, MemberStatus, NewGroup};
pub use groups_traits::GroupServiceTrait;
