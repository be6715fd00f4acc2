//! Service configuration.

mod settings;

pub use settings::{
    DatabaseSettings, NotificationSettings, Settings, SubmissionSettings, WarehouseSettings,
};
