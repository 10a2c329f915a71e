pub mod config;
pub mod filter;
pub mod model;
pub mod projection;
pub mod query;
pub mod session;
pub mod store;

pub use config::AppConfig;
pub use filter::{FilterState, SortDirection, SortField, SortState, StatusFilter};
pub use model::*;
pub use projection::project;
pub use session::{Session, ThemePreference};
pub use store::{TaskStore, ToggleUndo};
