use std::{net::TcpListener, sync::Arc, time::Duration};

use portfolio_contact::contact_form::{
    Field, NotificationKind, SubmissionController, SubmissionPayload, SubmissionState,
    SubmitOutcome,
};
use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::helper::spawn_app;

fn fill(controller: &SubmissionController) {
    controller.on_field_change(Field::Name, "Jane");
    controller.on_field_change(Field::Email, "jane@x.com");
    controller.on_field_change(Field::Subject, "Hi");
    controller.on_field_change(Field::Message, "Hello");
}

fn filled_payload() -> SubmissionPayload {
    SubmissionPayload {
        name: "Jane".into(),
        email: "jane@x.com".into(),
        subject: "Hi".into(),
        message: "Hello".into(),
    }
}

/// 直接模拟`/api/send-email`端点
async fn mock_endpoint(response: ResponseTemplate, expected: u64) -> MockServer {
    let endpoint = MockServer::start().await;
    Mock::given(path("/api/send-email"))
        .and(method("POST"))
        .respond_with(response)
        .expect(expected)
        .mount(&endpoint)
        .await;
    endpoint
}

#[tokio::test]
async fn successful_submission_clears_payload() {
    let app = spawn_app().await;
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let controller = Arc::new(app.controller());
    fill(&controller);
    let mut states = controller.subscribe();

    let handle = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit().await }
    });

    // idle -> loading
    assert!(states.wait_for(|s| s.is_loading()).await.is_ok());
    // loading -> success
    assert_eq!(SubmitOutcome::Sent, handle.await.unwrap());
    assert_eq!(SubmissionState::Success, controller.state());
    assert_eq!(SubmissionPayload::default(), controller.payload());

    let notification = controller.state().notification().unwrap();
    assert_eq!(NotificationKind::Success, notification.kind);

    // success -> idle
    assert!(controller.auto_dismiss_notification().await);
    assert_eq!(SubmissionState::Idle, controller.state());
}

#[tokio::test]
async fn relay_failure_keeps_payload() {
    let app = spawn_app().await;
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let controller = app.controller();
    fill(&controller);

    let outcome = controller.submit().await;

    assert_eq!(SubmitOutcome::Failed("Failed to send email".into()), outcome);
    assert_eq!(
        SubmissionState::Error("Failed to send email".into()),
        controller.state()
    );
    assert_eq!(filled_payload(), controller.payload());
}

#[tokio::test]
async fn retry_after_failure() {
    let app = spawn_app().await;
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&app.email_server)
        .await;
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let controller = app.controller();
    fill(&controller);

    assert!(matches!(controller.submit().await, SubmitOutcome::Failed(_)));
    assert_eq!(SubmitOutcome::Sent, controller.submit().await);
    assert_eq!(SubmissionState::Success, controller.state());
}

#[tokio::test]
async fn second_submit_while_loading_is_ignored() {
    let response = ResponseTemplate::new(200)
        .set_body_json(json!({ "message": "Email sent successfully" }))
        .set_delay(Duration::from_millis(300));
    let endpoint = mock_endpoint(response, 1).await;

    let controller = Arc::new(SubmissionController::new(&endpoint.uri()).unwrap());
    fill(&controller);
    let mut states = controller.subscribe();

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit().await }
    });
    assert!(states.wait_for(|s| s.is_loading()).await.is_ok());

    assert_eq!(SubmitOutcome::Ignored, controller.submit().await);
    assert_eq!(SubmitOutcome::Sent, first.await.unwrap());
}

#[tokio::test]
async fn payload_is_posted_as_json() {
    let endpoint = MockServer::start().await;
    Mock::given(path("/api/send-email"))
        .and(method("POST"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "name": "Jane",
            "email": "jane@x.com",
            "message": "Hello",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Email sent successfully" })),
        )
        .expect(1)
        .mount(&endpoint)
        .await;

    let controller = SubmissionController::new(&endpoint.uri()).unwrap();
    controller.on_field_change(Field::Name, "Jane");
    controller.on_field_change(Field::Email, "jane@x.com");
    controller.on_field_change(Field::Message, "Hello");

    assert_eq!(SubmitOutcome::Sent, controller.submit().await);
}

#[tokio::test]
async fn invalid_payload_is_not_sent() {
    let endpoint = mock_endpoint(ResponseTemplate::new(200), 0).await;
    let controller = SubmissionController::new(&endpoint.uri()).unwrap();
    controller.on_field_change(Field::Name, "A");
    controller.on_field_change(Field::Email, "not-an-email");
    controller.on_field_change(Field::Message, "hi");

    let outcome = controller.submit().await;

    let SubmitOutcome::Invalid(errors) = outcome else {
        panic!("expected validation errors, got {outcome:?}");
    };
    assert_eq!("Please enter a valid email", errors.email);
    assert!(errors.name.is_empty());
    assert_eq!(SubmissionState::Idle, controller.state());
}

#[tokio::test]
async fn rejection_without_error_message_uses_fallback() {
    let endpoint = mock_endpoint(ResponseTemplate::new(503), 1).await;
    let controller = SubmissionController::new(&endpoint.uri()).unwrap();
    fill(&controller);

    let outcome = controller.submit().await;

    assert_eq!(SubmitOutcome::Failed("Failed to send message".into()), outcome);
    assert_eq!(filled_payload(), controller.payload());
}

#[tokio::test]
async fn malformed_success_body_is_an_error() {
    let response = ResponseTemplate::new(200).set_body_string("<html>not json</html>");
    let endpoint = mock_endpoint(response, 1).await;
    let controller = SubmissionController::new(&endpoint.uri()).unwrap();
    fill(&controller);

    let outcome = controller.submit().await;

    let SubmitOutcome::Failed(message) = outcome else {
        panic!("expected a failure, got {outcome:?}");
    };
    assert!(!message.is_empty());
    assert_eq!(SubmissionState::Error(message), controller.state());
    assert_eq!(filled_payload(), controller.payload());
}

#[tokio::test]
async fn transport_failure_is_an_error() {
    // 绑定后立即释放端口，连接会被拒绝
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let controller = SubmissionController::new(&format!("http://127.0.0.1:{port}")).unwrap();
    fill(&controller);

    let outcome = controller.submit().await;

    let SubmitOutcome::Failed(message) = outcome else {
        panic!("expected a failure, got {outcome:?}");
    };
    assert!(!message.is_empty());
    assert!(controller.state().is_terminal());
    assert_eq!(filled_payload(), controller.payload());
}
