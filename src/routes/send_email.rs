use std::fmt::Debug;

use actix_web::{
    body::BoxBody, error::JsonPayloadError, http::StatusCode, web, HttpRequest, HttpResponse,
    ResponseError,
};

use crate::{
    domain::{ContactMessage, ContactRequest},
    email_client::EmailClient,
    startup::ContactInbox,
    util::error_chain_fmt,
};

pub const SEND_EMAIL_PATH: &str = "/api/send-email";

#[derive(serde::Serialize)]
struct SuccessBody {
    message: &'static str,
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

#[tracing::instrument(
    name = "转发联系表单邮件",
    skip(body, email_client, inbox),
    fields(
        contact_name = tracing::field::Empty,
        contact_email = tracing::field::Empty,
    )
)]
pub async fn send_email(
    body: web::Json<ContactRequest>,
    email_client: web::Data<EmailClient>,
    inbox: web::Data<ContactInbox>,
) -> Result<HttpResponse, SendEmailError> {
    let message = ContactMessage::try_from(body.into_inner()).map_err(|e| {
        tracing::warn!("rejected contact request. {e}");
        SendEmailError::MissingFields
    })?;
    tracing::Span::current()
        .record("contact_name", tracing::field::display(&message.name))
        .record("contact_email", tracing::field::display(&message.email));

    email_client
        .send(
            inbox.address(),
            &message.subject(),
            &message.text_body(),
            &message.html_body(),
        )
        .await
        .map_err(|e| {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "failed to send email."
            );
            SendEmailError::DispatchError(e)
        })?;
    tracing::info!("邮件发送成功.");

    Ok(HttpResponse::Ok().json(SuccessBody {
        message: "Email sent successfully",
    }))
}

/// 请求体无法解析时，同样按缺少必填项处理；超出大小限制的除外
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!("failed to parse contact request body. {err}");
    match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            SendEmailError::PayloadTooLarge.into()
        }
        _ => SendEmailError::MissingFields.into(),
    }
}

#[derive(thiserror::Error)]
pub enum SendEmailError {
    #[error("Name, email, and message are required")]
    MissingFields,
    #[error("Request body is too large")]
    PayloadTooLarge,
    #[error("Failed to send email")]
    DispatchError(#[source] reqwest::Error),
}

impl Debug for SendEmailError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SendEmailError {
    fn status_code(&self) -> StatusCode {
        match self {
            SendEmailError::MissingFields => StatusCode::BAD_REQUEST,
            SendEmailError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            SendEmailError::DispatchError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}
