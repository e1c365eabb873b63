//! Reusable widget components.

pub mod detail;
pub mod filter;
pub mod pager;
pub mod status;

pub use detail::DetailPanel;
pub use filter::FilterBar;
pub use pager::Pager;
pub use status::StatusBadge;
