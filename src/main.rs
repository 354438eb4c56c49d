use std::net::TcpListener;

use actix_web::web;
use portfolio_contact::{email_client::EmailClient, startup::ContactInbox, telemetry};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // 遥测初始化
    let subscriber = telemetry::get_subscriber("portfolio-contact", "info", std::io::stdout);
    telemetry::init_subscriber(subscriber);

    // 缺少邮件中继凭证时直接退出
    let config = portfolio_contact::config::config().expect("failed to load configuration.");
    let listener =
        TcpListener::bind(config.web.server_address()).expect("failed to bind web port.");

    let recipient = config
        .email_client
        .recipient()
        .expect("invalid recipient address.");
    let email_client = EmailClient::from_config(&config.email_client)
        .expect("failed to build email client.");

    // 构造web Arc
    let email_client = web::Data::new(email_client);
    let inbox = web::Data::new(ContactInbox::new(recipient));

    portfolio_contact::run(listener, email_client, inbox)?.await
}
