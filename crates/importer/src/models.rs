mod event;
mod settings;

pub use event::{ImporterEvent, Notification, NotificationAction, NotificationStatus};
pub use settings::{AdminSettings, HttpSettings, ImportSettings, Settings};
