pub const SUCCESS_NOTIFICATION: &str = "Message sent successfully!";

/// 一次提交所处的阶段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SubmissionState::Loading)
    }

    /// `Success`与`Error`在展示一段时间后回到`Idle`
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionState::Success | SubmissionState::Error(_))
    }

    pub fn notification(&self) -> Option<Notification> {
        match self {
            SubmissionState::Success => Some(Notification {
                kind: NotificationKind::Success,
                message: SUCCESS_NOTIFICATION.into(),
            }),
            SubmissionState::Error(message) => Some(Notification {
                kind: NotificationKind::Error,
                message: message.clone(),
            }),
            SubmissionState::Idle | SubmissionState::Loading => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}
