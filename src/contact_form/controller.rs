use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use anyhow::Context;
use reqwest::StatusCode;
use tokio::sync::watch;

use crate::{config::ContactFormConfig, routes::SEND_EMAIL_PATH};

use super::{validate, Field, SubmissionPayload, SubmissionState, ValidationErrors};

const GENERIC_FAILURE: &str = "Failed to send message";
const UNKNOWN_ERROR: &str = "An unknown error occurred";
const NOTIFICATION_DURATION: Duration = Duration::from_millis(6_000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 已有请求在处理中，本次提交被忽略
    Ignored,
    Invalid(ValidationErrors),
    Sent,
    Failed(String),
}

#[derive(thiserror::Error, Debug)]
pub enum SubmitError {
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl SubmitError {
    /// 展示给用户的错误信息
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Rejected { message, .. } => message.clone(),
            SubmitError::Transport(e) => {
                let description = e.to_string();
                if description.trim().is_empty() {
                    UNKNOWN_ERROR.into()
                } else {
                    description
                }
            }
        }
    }
}

#[derive(serde::Deserialize)]
struct EndpointResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Default)]
struct FormState {
    payload: SubmissionPayload,
    errors: ValidationErrors,
}

/// 持有一个表单实例的payload、校验错误与提交状态
///
/// 同一时刻最多只有一个提交请求在处理中。
pub struct SubmissionController {
    client: reqwest::Client,
    endpoint: reqwest::Url,
    notification_duration: Duration,
    form: Mutex<FormState>,
    state: watch::Sender<SubmissionState>,
}

impl SubmissionController {
    pub fn new(base_url: &str) -> Result<Self, anyhow::Error> {
        let endpoint = reqwest::Url::parse(base_url)
            .and_then(|url| url.join(SEND_EMAIL_PATH))
            .with_context(|| format!("failed to parse endpoint base url `{base_url}`."))?;

        Ok(Self {
            // 不设置超时，沿用底层默认行为
            client: reqwest::Client::new(),
            endpoint,
            notification_duration: NOTIFICATION_DURATION,
            form: Mutex::new(FormState::default()),
            state: watch::Sender::new(SubmissionState::Idle),
        })
    }

    pub fn from_config(config: &ContactFormConfig) -> Result<Self, anyhow::Error> {
        Ok(Self {
            notification_duration: config.notification_duration(),
            ..Self::new(&config.endpoint_base_url)?
        })
    }

    pub fn notification_duration(&self) -> Duration {
        self.notification_duration
    }

    pub fn payload(&self) -> SubmissionPayload {
        self.lock_form().payload.clone()
    }

    pub fn errors(&self) -> ValidationErrors {
        self.lock_form().errors.clone()
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// 更新一个字段，并清除该字段已有的错误（不重新校验）
    pub fn on_field_change(&self, field: Field, value: impl Into<String>) {
        {
            let mut form = self.lock_form();
            form.payload = form.payload.with_field(field, value);
            form.errors.clear(field);
        }
        self.dismiss();
    }

    /// 将`Success`或`Error`重置为`Idle`
    pub fn dismiss(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_terminal() {
                *state = SubmissionState::Idle;
                true
            } else {
                false
            }
        })
    }

    /// 展示`after`后自动重置，期间状态发生变化则不处理
    pub async fn auto_dismiss(&self, after: Duration) -> bool {
        let mut receiver = self.state.subscribe();
        if !receiver.borrow_and_update().is_terminal() {
            return false;
        }
        tokio::time::sleep(after).await;
        if receiver.has_changed().unwrap_or(true) {
            return false;
        }
        self.dismiss()
    }

    /// 按配置的展示时长自动重置
    pub async fn auto_dismiss_notification(&self) -> bool {
        self.auto_dismiss(self.notification_duration).await
    }

    #[tracing::instrument(name = "提交联系表单", skip(self))]
    pub async fn submit(&self) -> SubmitOutcome {
        let in_flight = self.state.borrow().is_loading();
        if in_flight {
            tracing::debug!("a submission is already in flight.");
            return SubmitOutcome::Ignored;
        }

        let payload = {
            let mut form = self.lock_form();
            let errors = validate(&form.payload);
            if !errors.is_valid() {
                form.errors = errors.clone();
                return SubmitOutcome::Invalid(errors);
            }
            form.errors = ValidationErrors::default();
            form.payload.clone()
        };

        // 上一次的结果先回到`Idle`，`Loading`只能从`Idle`进入
        self.dismiss();
        if !self.enter_loading() {
            return SubmitOutcome::Ignored;
        }

        match self.post(&payload).await {
            Ok(()) => {
                self.lock_form().payload = SubmissionPayload::default();
                self.state.send_replace(SubmissionState::Success);
                SubmitOutcome::Sent
            }
            Err(e) => {
                tracing::warn!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "failed to submit contact form."
                );
                let message = e.user_message();
                self.state
                    .send_replace(SubmissionState::Error(message.clone()));
                SubmitOutcome::Failed(message)
            }
        }
    }

    // 检查与切换在同一把锁内完成，并发提交只有一个能进入`Loading`
    fn enter_loading(&self) -> bool {
        self.state.send_if_modified(|state| {
            if *state == SubmissionState::Idle {
                *state = SubmissionState::Loading;
                true
            } else {
                false
            }
        })
    }

    async fn post(&self, payload: &SubmissionPayload) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.json::<EndpointResponse>().await?;
            tracing::info!(
                "contact form accepted: {}",
                body.message.as_deref().unwrap_or_default()
            );
            return Ok(());
        }

        let message = response
            .json::<EndpointResponse>()
            .await
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.into());

        Err(SubmitError::Rejected { status, message })
    }

    fn lock_form(&self) -> MutexGuard<'_, FormState> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
