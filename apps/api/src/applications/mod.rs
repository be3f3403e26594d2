// Job applications: list with search/status filter, detail with status
// changes and deletion, add/edit forms.

pub mod detail;
pub mod filter;
pub mod form;
pub mod handlers;
pub mod list;
