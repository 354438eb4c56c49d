/// 联系表单中的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Message => "message",
        }
    }
}

impl TryFrom<&str> for Field {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "name" => Ok(Field::Name),
            "email" => Ok(Field::Email),
            "subject" => Ok(Field::Subject),
            "message" => Ok(Field::Message),
            other => Err(format!("`{other}` is not a contact form field.")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subject: String,
    pub message: String,
}

impl SubmissionPayload {
    /// 替换一个字段，其余字段保持不变
    pub fn with_field(&self, field: Field, value: impl Into<String>) -> Self {
        let value = value.into();
        let mut payload = self.clone();
        match field {
            Field::Name => payload.name = value,
            Field::Email => payload.email = value,
            Field::Subject => payload.subject = value,
            Field::Message => payload.message = value,
        }
        payload
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }
}
