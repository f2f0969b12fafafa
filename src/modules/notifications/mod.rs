pub mod dispatcher;

pub use dispatcher::{
    LogDispatcher, NotificationDispatcher, NotificationEvent, NotificationKind, RelatedEntity,
};
