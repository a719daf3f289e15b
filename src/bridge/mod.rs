//! Page bridge: the page side of the messaging contract.
//!
//!   - messages.rs - wire messages between background and page
//!   - overlay.rs  - overlay state + pure render
//!   - page.rs     - per-page task and its handle
//!   - tabs.rs     - tab host used by the dispatcher

pub mod messages;
pub mod overlay;
pub mod page;
pub mod tabs;

pub use messages::{PageMessage, SelectionReply};
pub use overlay::{render, OverlayAction, OverlayState, OverlayView};
pub use page::{spawn_page, Page, PageHandle, PageId};
pub use tabs::{TabHost, Tabs};
