//! Tests for the SoundCloud client against a mock API server.

use serde_json::json;
use soundcloud_client::{
    ClientConfig, ClientId, CompletionQueue, HttpMethod, Parameters, RawResponse, ReqwestTransport,
    RequestState, Result, SdkError, SoundcloudClient, Track, Transport, TransportErrorKind, User,
    FORM_CONTENT_TYPE,
};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::oneshot;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLIENT_ID: &str = "test-client";

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(ClientId::new(CLIENT_ID).unwrap())
        .with_api_url(&server.uri())
        .unwrap()
}

fn client_for(server: &MockServer) -> (SoundcloudClient, JoinHandle<()>) {
    let (queue, thread) = CompletionQueue::spawn_thread("test-completions").unwrap();
    let client = SoundcloudClient::with_reqwest(config_for(server), queue).unwrap();
    (client, thread)
}

/// Completion callback that forwards its result together with the name of the
/// thread it ran on.
fn completion<T: Send + 'static>() -> (
    impl FnOnce(Result<T>) + Send + 'static,
    oneshot::Receiver<(Option<String>, Result<T>)>,
) {
    let (tx, rx) = oneshot::channel();
    let callback = move |result: Result<T>| {
        let thread = std::thread::current().name().map(str::to_owned);
        let _ = tx.send((thread, result));
    };
    (callback, rx)
}

async fn wait<T>(rx: oneshot::Receiver<(Option<String>, Result<T>)>) -> (Option<String>, Result<T>) {
    tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .expect("completion timed out")
        .expect("completion dropped without running")
}

fn track_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "duration": 185000,
        "streamable": true,
        "created_at": "2012/06/01 10:20:30 +0000",
        "tag_list": "ambient \"field recording\"",
        "user": {
            "id": 7,
            "username": "someone",
            "avatar_url": "https://i1.sndcdn.com/avatars-000001-large.jpg"
        }
    })
}

// =============================================================================
// Track Endpoint Tests
// =============================================================================

mod tracks {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_get_track_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tracks/42"))
            .and(query_param("client_id", CLIENT_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(track_json(42, "Track A")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _thread) = client_for(&mock_server);
        let (callback, rx) = completion::<Track>();
        let mut request = client.track(42, callback).unwrap();
        request.start().unwrap();

        let (thread, result) = wait(rx).await;
        assert_eq!(thread.as_deref(), Some("test-completions"));

        let track = result.unwrap();
        assert_eq!(track.identifier, 42);
        assert_eq!(track.title, "Track A");
        assert_eq!(track.duration, Duration::from_millis(185000));
        assert_eq!(track.created_by.username, "someone");
        assert_eq!(
            track.tags,
            Some(vec!["ambient".to_string(), "field recording".to_string()])
        );
        assert_eq!(request.state(), RequestState::Completed);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_get_track_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tracks/999"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&mock_server)
            .await;

        let (client, _thread) = client_for(&mock_server);
        let (callback, rx) = completion::<Track>();
        client.track(999, callback).unwrap().start().unwrap();

        match wait(rx).await.1 {
            Err(SdkError::Server { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("Expected server error, got: {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_malformed_body_is_parsing_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tracks/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let (client, _thread) = client_for(&mock_server);
        let (callback, rx) = completion::<Track>();
        client.track(1, callback).unwrap().start().unwrap();

        let (_, result) = wait(rx).await;
        assert!(matches!(result, Err(SdkError::Parsing { .. })));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_track_without_user_reports_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tracks/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "title": "x"})))
            .mount(&mock_server)
            .await;

        let (client, _thread) = client_for(&mock_server);
        let (callback, rx) = completion::<Track>();
        client.track(5, callback).unwrap().start().unwrap();

        match wait(rx).await.1 {
            Err(SdkError::Parsing { field }) => assert_eq!(field.as_deref(), Some("user")),
            other => panic!("Expected parsing error, got: {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_search_sends_query_and_limit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/tracks"))
            .and(query_param("q", "field recording"))
            .and(query_param("limit", "2"))
            .and(query_param("client_id", CLIENT_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                track_json(1, "One"),
                {"id": 2, "title": "broken"},
                track_json(3, "Three"),
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _thread) = client_for(&mock_server);
        let (callback, rx) = completion::<Vec<Track>>();
        client
            .search_tracks("field recording", Some(2), callback)
            .unwrap()
            .start()
            .unwrap();

        let tracks = wait(rx).await.1.unwrap();
        let ids: Vec<i64> = tracks.iter().map(|t| t.identifier).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_user_tracks_accepts_collection_wrapper() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/7/tracks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "collection": [track_json(10, "Ten")],
                "next_href": null
            })))
            .mount(&mock_server)
            .await;

        let (client, _thread) = client_for(&mock_server);
        let (callback, rx) = completion::<Vec<Track>>();
        client.user_tracks(7, callback).unwrap().start().unwrap();

        let tracks = wait(rx).await.1.unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "Ten");
    }
}

// =============================================================================
// User Endpoint Tests
// =============================================================================

mod users {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_get_user_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/7"))
            .and(query_param("client_id", CLIENT_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7,
                "username": "someone",
                "city": "Berlin",
                "followers_count": 1200
            })))
            .mount(&mock_server)
            .await;

        let (client, _thread) = client_for(&mock_server);
        let (callback, rx) = completion::<User>();
        client.user(7, callback).unwrap().start().unwrap();

        let user = wait(rx).await.1.unwrap();
        assert_eq!(user.identifier, 7);
        assert_eq!(user.username, "someone");
        assert_eq!(user.city.as_deref(), Some("Berlin"));
        assert_eq!(user.followers_count, Some(1200));
    }
}

// =============================================================================
// Generic Request Tests
// =============================================================================

mod generic_requests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_post_sends_form_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/me/playlists"))
            .and(query_param("client_id", CLIENT_ID))
            .and(header("content-type", FORM_CONTENT_TYPE))
            .and(body_string("title=New+List&sharing=private"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 99})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (client, _thread) = client_for(&mock_server);
        let parameters = Parameters::new()
            .with("title", "New List")
            .with("sharing", "private");

        let (callback, rx) = completion::<i64>();
        let mut request = client
            .request(
                HttpMethod::Post,
                "/me/playlists",
                Some(&parameters),
                |json| json.at("id").as_int().ok_or_else(|| SdkError::parsing("id")),
                callback,
            )
            .unwrap();
        request.start().unwrap();

        assert_eq!(wait(rx).await.1.unwrap(), 99);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unreachable_host_is_transport_error() {
        let config = ClientConfig::new(ClientId::new(CLIENT_ID).unwrap())
            .with_api_url("http://127.0.0.1:1")
            .unwrap();
        let (queue, _thread) = CompletionQueue::spawn_thread("test-completions").unwrap();
        let client = SoundcloudClient::with_reqwest(config, queue).unwrap();

        let (callback, rx) = completion::<Track>();
        client.track(1, callback).unwrap().start().unwrap();

        match wait(rx).await.1 {
            Err(SdkError::Transport(e)) => assert_eq!(e.kind, TransportErrorKind::Connect),
            other => panic!("Expected transport error, got: {:?}", other),
        }
    }

    #[test]
    fn test_client_requires_runtime() {
        let mock_config = ClientConfig::new(ClientId::new(CLIENT_ID).unwrap());
        let (queue, _completions) = CompletionQueue::new();
        let result = SoundcloudClient::with_reqwest(mock_config, queue);
        assert!(matches!(result, Err(SdkError::Configuration(_))));
    }
}

// =============================================================================
// Transport Tests
// =============================================================================

mod transport {
    use super::*;

    #[tokio::test]
    async fn test_reqwest_transport_returns_raw_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/tracks/3"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&mock_server)
            .await;

        let config = config_for(&mock_server);
        let transport = ReqwestTransport::new(&config).unwrap();
        let descriptor = HttpMethod::Delete.request(config.resource_url("tracks/3").unwrap(), None);

        let response = transport.execute(descriptor).await.unwrap();
        assert_eq!(response, RawResponse::new(503, "busy"));
        assert!(!response.is_success());
    }
}
