use chrono::{TimeZone, Utc};
use maintcal_sync::integrations::{CalendarPublisher, GoogleCalendarClient, PublishAck};
use maintcal_sync::SyncError;
use shared_types::{MaintenanceEvent, MaintenanceNotification};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EVENTS_PATH: &str = "/calendars/primary/events";

/// The blocking client must not run on the async test runtime's threads.
async fn with_client<T, F>(server: &MockServer, f: F) -> T
where
    T: Send + 'static,
    F: FnOnce(&GoogleCalendarClient) -> T + Send + 'static,
{
    let base = server.uri();
    tokio::task::spawn_blocking(move || {
        let client = GoogleCalendarClient::new(&base, "primary", "test-token".to_string());
        f(&client)
    })
    .await
    .unwrap()
}

fn event() -> MaintenanceEvent {
    MaintenanceEvent::from(&MaintenanceNotification {
        subject: "Scheduled Maintenance Notice".to_string(),
        cid: "ABC1234XYZ".to_string(),
        partner: "Partner A".to_string(),
        start_time: Utc.with_ymd_and_hms(2017, 12, 1, 1, 0, 0).unwrap(),
        end_time: Utc.with_ymd_and_hms(2017, 12, 1, 2, 0, 0).unwrap(),
        original_message: "CID: ABC1234XYZ".to_string(),
        event_uuid: "0123456789abcdef".to_string(),
    })
}

#[tokio::test]
async fn test_exists_checks_event_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/0123456789abcdef", EVENTS_PATH)))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "0123456789abcdef"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/fedcba9876543210", EVENTS_PATH)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let (found, missing) = with_client(&server, |client| {
        (
            client.exists("0123456789abcdef").unwrap(),
            client.exists("fedcba9876543210").unwrap(),
        )
    })
    .await;

    assert!(found);
    assert!(!missing);
}

#[tokio::test]
async fn test_exists_reports_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&server)
        .await;

    let result = with_client(&server, |client| client.exists("0123456789abcdef")).await;

    match result {
        Err(SyncError::Calendar(message)) => assert!(message.contains("500")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_publish_sends_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EVENTS_PATH))
        .and(body_partial_json(serde_json::json!({
            "id": "0123456789abcdef",
            "summary": "Scheduled Maintenance: Partner A ABC1234XYZ",
            "location": "",
            "start": {"dateTime": "2017-12-01T01:00:00Z", "timeZone": "UTC"},
            "end": {"dateTime": "2017-12-01T02:00:00Z", "timeZone": "UTC"},
            "reminders": {"useDefault": true}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "0123456789abcdef",
            "htmlLink": "https://calendar.example/event/1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ack = with_client(&server, |client| client.publish(&event()).unwrap()).await;

    assert_eq!(
        ack,
        PublishAck::Created {
            link: Some("https://calendar.example/event/1".to_string())
        }
    );
}

#[tokio::test]
async fn test_publish_conflict_means_already_existed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(EVENTS_PATH))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "error": {"code": 409, "message": "The requested identifier already exists."}
        })))
        .mount(&server)
        .await;

    let ack = with_client(&server, |client| client.publish(&event()).unwrap()).await;

    assert_eq!(ack, PublishAck::AlreadyExisted);
}

#[tokio::test]
async fn test_list_windows_follows_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(query_param("singleEvents", "true"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {
                    "id": "all-day",
                    "start": {"date": "2017-12-03"},
                    "end": {"date": "2017-12-04"}
                }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(EVENTS_PATH))
        .and(query_param("singleEvents", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                {
                    "id": "first",
                    "summary": "Scheduled Maintenance: Partner A ABC1234XYZ",
                    "start": {"dateTime": "2017-12-01T01:00:00Z"},
                    "end": {"dateTime": "2017-12-01T02:00:00Z"}
                },
                {"id": "cancelled"}
            ],
            "nextPageToken": "page-2"
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let windows = with_client(&server, |client| client.list_windows().unwrap()).await;

    let ids: Vec<_> = windows.iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "all-day"]);
    assert_eq!(windows[0].summary.as_deref(), Some("Scheduled Maintenance: Partner A ABC1234XYZ"));
    assert_eq!(windows[1].start, Utc.with_ymd_and_hms(2017, 12, 3, 0, 0, 0).unwrap());
}
