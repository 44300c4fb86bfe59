//! Chat assistant: the conversation log, the widget around it and the
//! passages shown under each answer.

pub mod hub;
pub mod references;
pub mod session;
pub mod widget;

pub use hub::{ChatError, ChatEvent, ChatHub, SubmitOutcome, WidgetAction};
pub use references::ReferenceStyle;
pub use session::{ChatSession, ChatTurn, Rejection, Role};
pub use widget::{ChatView, ChatWidget, Key};
