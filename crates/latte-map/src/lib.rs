//! Map core: viewport handling, shop feeds, layer filtering and persistence.

pub mod error;
pub mod feed;
pub mod merge;
pub mod navigation;
pub mod session;
pub mod storage;
pub mod viewport;

pub use error::{MapError, StoreError};
pub use feed::ShopFeedClient;
pub use merge::visible_shops;
pub use navigation::{navigate, Navigation};
pub use session::{run_session, MapSession, RefreshTicket};
pub use storage::{load_layers, save_layers, LocalStore, LAYERS_KEY};
pub use viewport::{Viewport, ViewportDebouncer};
