//! Static analysis over the state table.
//!
//! Nothing here touches the live world. Queries read the immutable
//! [`StateTable`](crate::state::StateTable) and a [`Subject`] describing the
//! thing being analyzed, and may run concurrently from several threads as long
//! as each one owns its [`ReachQuery`].
mod branch;
mod decor;
mod reach;

pub use branch::{BranchResolver, Subject};
pub use decor::{DecorationClassifier, breaks_decoration, removes_solid};
pub use reach::{ReachQuery, Reachability};
