mod paged_list;
mod status_bar;

pub use paged_list::PagedListWidget;
pub use status_bar::StatusBarWidget;
