use validator::ValidateEmail;

/// 经过校验的邮件地址，用于配置中的发件人与收件人
#[derive(Debug, Clone)]
pub struct ContactEmail(String);

impl ContactEmail {
    pub fn parse(s: &str) -> Result<ContactEmail, String> {
        let s = s.trim();
        if s.validate_email() {
            Ok(Self(s.into()))
        } else {
            Err(format!("`{s}` is not a valid email address."))
        }
    }
}

impl AsRef<str> for ContactEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContactEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
