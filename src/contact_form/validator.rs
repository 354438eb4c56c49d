use once_cell::sync::Lazy;
use regex::Regex;

use super::{Field, SubmissionPayload};

// 仅检查形如 local@domain.tld 的格式，不验证邮箱是否可达
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("invalid email pattern."));

/// 各字段的错误信息，空字符串表示该字段无错误
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ValidationErrors {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ValidationErrors {
    pub fn is_valid(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.message.is_empty()
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
            Field::Subject => "",
        }
    }

    /// 清除字段的错误，返回该字段之前是否有错误
    pub fn clear(&mut self, field: Field) -> bool {
        let error = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Message => &mut self.message,
            Field::Subject => return false,
        };
        let had_error = !error.is_empty();
        error.clear();
        had_error
    }
}

/// 校验联系表单，所有规则都会执行
pub fn validate(payload: &SubmissionPayload) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if payload.name.trim().is_empty() {
        errors.name = "Name is required".into();
    }

    let email = payload.email.trim();
    if email.is_empty() {
        errors.email = "Email is required".into();
    } else if !EMAIL_PATTERN.is_match(email) {
        errors.email = "Please enter a valid email".into();
    }

    if payload.message.trim().is_empty() {
        errors.message = "Message is required.".into();
    }

    errors
}
