pub mod cli;
pub mod condition;
pub mod config;
pub mod error;
pub mod monitor;
pub mod notifier;
pub mod output;
pub mod resource;
pub mod schedule;
pub mod task;

// Public API
pub use condition::{Condition, Evaluation};
pub use config::{load_config, LoadedConfig};
pub use error::{ConditionError, ConfigError, NotifyError, TaskError, TickError};
pub use monitor::{Monitor, TickReport, TransitionTracker};
pub use notifier::{NotificationEvent, Notifier, NotifierHandle, Presenter, Severity};
pub use output::OutputSink;
pub use resource::Resource;
pub use schedule::{check_once, Runner};
pub use task::{Observation, ObservationKind, Task, TaskType};
