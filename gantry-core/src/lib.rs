pub mod config;
pub mod dispatch;
pub mod enablement;
pub mod event;
pub mod fatal;
pub mod git;
pub mod input;
pub mod keyboard;
pub mod menu;
pub mod model;
pub mod paths;
pub mod picker;
pub mod state;
pub mod store;

// Re-export commonly used types at crate root
pub use config::Config;
pub use dispatch::{Dispatcher, Intent};
pub use enablement::{MenuEnablement, MenuEnablementSink};
pub use event::StoreEvent;
pub use fatal::fatal_error;
pub use git::{CliGitProvider, GitProvider};
pub use keyboard::KeyEvent;
pub use menu::{MenuEvent, MenuSignal};
pub use model::{Branch, Repository, RepositoryId, RepositoryListItem, User};
pub use picker::DirectoryPicker;
pub use state::{AppState, Popup, SelectionState};
pub use store::{AppStore, StoreHandle, Subscription};
