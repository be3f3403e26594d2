// Resume versions: list with active toggling and deletion, add form.

pub mod form;
pub mod handlers;
pub mod list;
