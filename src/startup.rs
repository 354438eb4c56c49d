use std::net::TcpListener;

use actix_web::{dev::Server, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::{domain::ContactEmail, email_client::EmailClient, routes};

/// 联系表单邮件的收件地址
pub struct ContactInbox(ContactEmail);

impl ContactInbox {
    pub fn new(address: ContactEmail) -> Self {
        Self(address)
    }

    pub fn address(&self) -> &ContactEmail {
        &self.0
    }
}

pub fn run(
    listener: TcpListener,
    email_client: web::Data<EmailClient>,
    inbox: web::Data<ContactInbox>,
) -> std::io::Result<Server> {
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(routes::json_error_handler))
            .app_data(email_client.clone())
            .app_data(inbox.clone())
            .route("/health_check", web::get().to(routes::health_check))
            .route(routes::SEND_EMAIL_PATH, web::post().to(routes::send_email))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
