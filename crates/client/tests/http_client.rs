use std::time::Duration;

use bloodlink_client::{BloodBankApi, BloodBankClient, Error, Rejection, Reply};
use bloodlink_core::{BloodRequest, NotificationRequest, SearchParameters};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

struct MockServer {
    listener: TcpListener,
    base_url: String,
}

impl MockServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock server");
        let port = listener.local_addr().unwrap().port();
        let base_url = format!("http://127.0.0.1:{port}");
        Self { listener, base_url }
    }

    /// Accept one connection, answer with `status` and `body`, and return the
    /// raw request text.
    async fn respond_once(self, status: u16, content_type: &str, body: &str) -> String {
        let (mut stream, _) = self.listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;

        let response = format!(
            "HTTP/1.1 {status} Reply\r\n\
             Content-Type: {content_type}\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\
             \r\n\
             {body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        request
    }

    /// Accept one connection, read the request, and never answer.
    async fn stall(self, hold: Duration) {
        let (mut stream, _) = self.listener.accept().await.unwrap();
        let _ = read_request(&mut stream).await;
        tokio::time::sleep(hold).await;
    }
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        if let Some(head_end) = text.find("\r\n\r\n") {
            let content_length = text[..head_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn body_of(raw: &str) -> serde_json::Value {
    let (_, body) = raw.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

fn sample_request() -> BloodRequest {
    serde_json::from_value(serde_json::json!({
        "requesterName": "Ravi Kumar",
        "requesterPhone": "9876543210",
        "requesterEmail": "",
        "patientName": "Meena",
        "patientAge": 34,
        "patientGender": "Female",
        "bloodGroup": "O-",
        "unitsRequired": 2,
        "requiredDate": "2026-10-20",
        "hospitalName": "City Hospital",
        "hospitalAddress": "1 Main Road",
        "location": "Chennai",
        "createdAt": "2026-10-17",
        "updatedAt": "2026-10-17"
    }))
    .unwrap()
}

#[tokio::test]
async fn create_request_accepts_exact_acknowledgement() {
    let server = MockServer::start().await;
    let client = BloodBankClient::new(&server.base_url);
    let handle = tokio::spawn(async move {
        server
            .respond_once(200, "text/plain", "Registered and notified")
            .await
    });

    let reply = client.create_request(&sample_request()).await.unwrap();
    let raw = handle.await.unwrap();

    assert!(raw.starts_with("POST /api/Requester "));
    let sent = body_of(&raw);
    assert_eq!(sent["bloodGroup"], "O-");
    assert_eq!(sent["requesterEmail"], "");
    assert_eq!(sent["createdAt"], "2026-10-17");
    assert_eq!(
        reply.accepted().unwrap().as_str(),
        "Registered and notified"
    );
}

#[tokio::test]
async fn create_request_with_other_success_text_is_rejected() {
    let server = MockServer::start().await;
    let client = BloodBankClient::new(&server.base_url);
    let handle =
        tokio::spawn(async move { server.respond_once(200, "text/plain", "Saved").await });

    let reply = client.create_request(&sample_request()).await.unwrap();
    handle.await.unwrap();

    let rejection = reply.rejection().unwrap();
    assert_eq!(rejection.status, 200);
    assert_eq!(rejection.message, None);
}

#[tokio::test]
async fn create_request_rejection_carries_server_message() {
    let server = MockServer::start().await;
    let client = BloodBankClient::new(&server.base_url);
    let handle = tokio::spawn(async move {
        server
            .respond_once(400, "application/json", r#"{"message":"Hospital not registered"}"#)
            .await
    });

    let reply = client.create_request(&sample_request()).await.unwrap();
    handle.await.unwrap();

    let rejection = reply.rejection().unwrap();
    assert_eq!(rejection.status, 400);
    assert_eq!(rejection.message.as_deref(), Some("Hospital not registered"));
}

#[tokio::test]
async fn create_request_error_field_is_not_a_message() {
    let server = MockServer::start().await;
    let client = BloodBankClient::new(&server.base_url);
    let handle = tokio::spawn(async move {
        server
            .respond_once(
                500,
                "application/json",
                r#"{"status":500,"error":"Internal Server Error","message":""}"#,
            )
            .await
    });

    let reply = client.create_request(&sample_request()).await.unwrap();
    handle.await.unwrap();

    let rejection = reply.rejection().unwrap();
    assert_eq!(rejection.status, 500);
    assert_eq!(rejection.message, None);
}

#[tokio::test]
async fn find_donors_encodes_path_and_decodes_both_phone_keys() {
    let server = MockServer::start().await;
    let client = BloodBankClient::new(&server.base_url);
    let body = r#"[
        {"name":"Asha","bloodGroup":"AB+","location":"New Delhi","phone":"9000000001","availabilityStatus":true},
        {"name":"Bala","bloodGroup":"AB+","location":"New Delhi","phone_no":"9000000002","availabilityStatus":false,"age":41}
    ]"#;
    let handle =
        tokio::spawn(async move { server.respond_once(200, "application/json", body).await });

    let reply = client
        .find_donors(&SearchParameters::new("AB+", "New Delhi"))
        .await
        .unwrap();
    let raw = handle.await.unwrap();

    assert!(raw.starts_with("GET /api/DonorList/AB%2B/New%20Delhi "));
    let donors = reply.accepted().unwrap();
    assert_eq!(donors.len(), 2);
    assert_eq!(donors[0].name, "Asha");
    assert_eq!(donors[1].phone(), Some("9000000002"));
    assert_eq!(donors[1].age, Some(41));
    assert!(!donors[1].availability_status);
}

#[tokio::test]
async fn find_donors_tolerates_nulls_and_duplicate_phone_keys() {
    let server = MockServer::start().await;
    let client = BloodBankClient::new(&server.base_url);
    let body = r#"[
        {"name":"Asha","bloodGroup":"O-","location":"Chennai","phone":null,"phone_no":"9000000001","availabilityStatus":true},
        {"name":null,"bloodGroup":"O-","location":null,"phone":"9000000002","phone_no":"9000000009","email":null,"age":null,"lastDonationDate":null}
    ]"#;
    let handle =
        tokio::spawn(async move { server.respond_once(200, "application/json", body).await });

    let reply = client
        .find_donors(&SearchParameters::new("O-", "Chennai"))
        .await
        .unwrap();
    handle.await.unwrap();

    let donors = reply.accepted().unwrap();
    assert_eq!(donors.len(), 2);
    assert_eq!(donors[0].phone(), Some("9000000001"));
    assert_eq!(donors[1].name, "");
    assert_eq!(donors[1].location, "");
    assert_eq!(donors[1].phone(), Some("9000000002"));
    assert!(!donors[1].availability_status);
}

#[tokio::test]
async fn find_donors_empty_list_is_accepted() {
    let server = MockServer::start().await;
    let client = BloodBankClient::new(&server.base_url);
    let handle =
        tokio::spawn(async move { server.respond_once(200, "application/json", "[]").await });

    let reply = client
        .find_donors(&SearchParameters::new("B-", "Pune"))
        .await
        .unwrap();
    handle.await.unwrap();

    assert_eq!(reply, Reply::Accepted(Vec::new()));
}

#[tokio::test]
async fn find_donors_malformed_body_is_a_deserialization_error() {
    let server = MockServer::start().await;
    let client = BloodBankClient::new(&server.base_url);
    let handle = tokio::spawn(async move {
        server
            .respond_once(200, "application/json", r#"{"donors":[]}"#)
            .await
    });

    let err = client
        .find_donors(&SearchParameters::new("B-", "Pune"))
        .await
        .unwrap_err();
    handle.await.unwrap();

    assert!(matches!(err, Error::Deserialization(_)));
}

#[tokio::test]
async fn find_donors_times_out() {
    let server = MockServer::start().await;
    let client = BloodBankClient::builder(&server.base_url)
        .request_timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let handle = tokio::spawn(server.stall(Duration::from_secs(2)));

    let err = client
        .find_donors(&SearchParameters::new("O+", "Chennai"))
        .await
        .unwrap_err();
    handle.abort();

    assert!(matches!(err, Error::Timeout(d) if d == Duration::from_millis(200)));
}

#[tokio::test]
async fn unreachable_server_is_a_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = BloodBankClient::new(format!("http://127.0.0.1:{port}"));
    let err = client.create_request(&sample_request()).await.unwrap_err();

    assert!(matches!(err, Error::Connection(_)));
    assert!(err.is_connectivity());
}

#[tokio::test]
async fn notify_donors_sends_search_pair_and_snapshot() {
    let server = MockServer::start().await;
    let client = BloodBankClient::new(&server.base_url);
    let handle = tokio::spawn(async move {
        server
            .respond_once(
                200,
                "application/json",
                r#"{"message":"Emails sent successfully to donors"}"#,
            )
            .await
    });

    let request = NotificationRequest::new(
        &SearchParameters::new("O+", "Chennai"),
        sample_request(),
    );
    let reply = client.notify_donors(&request).await.unwrap();
    let raw = handle.await.unwrap();

    assert!(raw.starts_with("POST /api/NotifyDonors "));
    let sent = body_of(&raw);
    assert_eq!(sent["bloodGroup"], "O+");
    assert_eq!(sent["location"], "Chennai");
    assert_eq!(sent["requestDetails"]["bloodGroup"], "O-");
    assert_eq!(
        reply.accepted().unwrap().message,
        "Emails sent successfully to donors"
    );
}

#[tokio::test]
async fn notify_donors_failure_surfaces_error_text() {
    let server = MockServer::start().await;
    let client = BloodBankClient::new(&server.base_url);
    let handle = tokio::spawn(async move {
        server
            .respond_once(
                500,
                "application/json",
                r#"{"error":"Failed to send notifications: smtp unavailable"}"#,
            )
            .await
    });

    let request = NotificationRequest::new(&SearchParameters::new("O-", "Chennai"), sample_request());
    let reply = client.notify_donors(&request).await.unwrap();
    handle.await.unwrap();

    let rejection = reply.rejection().unwrap();
    assert_eq!(rejection.status, 500);
    assert_eq!(
        rejection.message.as_deref(),
        Some("Failed to send notifications: smtp unavailable")
    );
}

#[tokio::test]
async fn notify_donors_success_without_message_is_rejected() {
    let server = MockServer::start().await;
    let client = BloodBankClient::new(&server.base_url);
    let handle =
        tokio::spawn(async move { server.respond_once(200, "application/json", "{}").await });

    let request = NotificationRequest::new(&SearchParameters::new("O-", "Chennai"), sample_request());
    let reply = client.notify_donors(&request).await.unwrap();
    handle.await.unwrap();

    assert!(!reply.is_accepted());
}

#[tokio::test]
async fn notify_donors_plain_text_success_is_rejected() {
    let server = MockServer::start().await;
    let client = BloodBankClient::new(&server.base_url);
    let handle =
        tokio::spawn(async move { server.respond_once(200, "text/plain", "OK").await });

    let request = NotificationRequest::new(&SearchParameters::new("O-", "Chennai"), sample_request());
    let reply = client.notify_donors(&request).await.unwrap();
    handle.await.unwrap();

    assert_eq!(reply, Reply::Rejected(Rejection::new(200, None)));
}

#[tokio::test]
async fn notify_uses_its_own_timeout() {
    let server = MockServer::start().await;
    let client = BloodBankClient::builder(&server.base_url)
        .request_timeout(Duration::from_secs(30))
        .notify_timeout(Duration::from_millis(150))
        .build()
        .unwrap();
    let handle = tokio::spawn(server.stall(Duration::from_secs(2)));

    let request = NotificationRequest::new(&SearchParameters::new("O-", "Chennai"), sample_request());
    let err = client.notify_donors(&request).await.unwrap_err();
    handle.abort();

    assert!(err.is_timeout());
}
