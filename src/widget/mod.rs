pub mod loading;
pub mod page_view;
pub mod ruler;
pub mod spotlight;
