//! 联系表单的客户端部分：字段校验与提交控制

mod controller;
mod payload;
mod state;
mod validator;

pub use controller::{SubmissionController, SubmitError, SubmitOutcome};
pub use payload::{Field, SubmissionPayload};
pub use state::{Notification, NotificationKind, SubmissionState, SUCCESS_NOTIFICATION};
pub use validator::{validate, ValidationErrors};
