pub mod event;
pub mod host;
pub mod model;

pub use event::{LoadStatus, TabEvent};
pub use host::{GroupColor, GroupId, GroupUpdate, TabGroup, TabHost};
pub use model::{LiveTab, TabDescriptor, TabId, TabInfo};
