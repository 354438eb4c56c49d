use html_escape::encode_safe;

/// 请求体中的字段均可缺失，由[`ContactMessage`]统一检查
#[derive(serde::Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 通过必填项检查的联系表单消息
#[derive(Debug)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

impl TryFrom<ContactRequest> for ContactMessage {
    type Error = String;

    fn try_from(request: ContactRequest) -> Result<Self, Self::Error> {
        let name = required("name", request.name)?;
        let email = required("email", request.email)?;
        let message = required("message", request.message)?;
        let subject = request.subject.filter(|s| !s.trim().is_empty());

        Ok(Self {
            name,
            email,
            subject,
            message,
        })
    }
}

// 服务端只检查字段是否存在，不校验格式
fn required(field: &str, value: Option<String>) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(format!("`{field}` is missing or empty.")),
    }
}

impl ContactMessage {
    pub fn subject(&self) -> String {
        match &self.subject {
            Some(subject) => subject.clone(),
            None => format!("New message from {}", self.name),
        }
    }

    pub fn html_body(&self) -> String {
        let subject = self.subject.as_deref().unwrap_or("No subject");
        format!(
            "<h2>New Contact Form Submission</h2>\n\
            <p><strong>Name:</strong> {}</p>\n\
            <p><strong>Email:</strong> {}</p>\n\
            <p><strong>Subject:</strong> {}</p>\n\
            <p><strong>Message:</strong></p>\n\
            <p>{}</p>\n",
            encode_safe(&self.name),
            encode_safe(&self.email),
            encode_safe(subject),
            encode_safe(&self.message),
        )
    }

    pub fn text_body(&self) -> String {
        format!(
            "New Contact Form Submission\n\n\
            Name: {}\n\
            Email: {}\n\
            Subject: {}\n\n\
            {}\n",
            self.name,
            self.email,
            self.subject.as_deref().unwrap_or("No subject"),
            self.message,
        )
    }
}
