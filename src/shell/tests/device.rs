use crux_http::{
    HttpError,
    protocol::{HttpRequest, HttpResult},
};
use ntrip_duo::{
    http::DeviceClient,
    runtime::{Runtime, Script},
};
use ntrip_duo_core::{Configuration, Event, SyncState, build_url};
use reqwest::Url;
use std::{net::SocketAddr, time::Duration};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

const CONFIG: &str = r#"{"version":"2.1.0","w_sta_active":"1","w_sta_ssid":"rover-base","w_ap_active":"1","ntr_srv_active":"0"}"#;
const STATUS: &str = r#"{"uptime":61,"heap":{"free":50,"total":100},"wifi":{"sta":{"active":true,"connected":true,"ssid":"rover-base","ip4":"10.0.0.7"}}}"#;

#[derive(Debug)]
struct Received {
    method: String,
    path: String,
    body: String,
}

// Mock NTRIP Duo device speaking just enough HTTP/1.1
async fn start_mock_device() -> (SocketAddr, mpsc::UnboundedReceiver<Received>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock device");
    let addr = listener.local_addr().expect("failed to get local address");
    let (received_tx, received_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let received_tx = received_tx.clone();
            tokio::spawn(async move {
                if let Some(received) = serve(stream).await {
                    let _ = received_tx.send(received);
                }
            });
        }
    });

    (addr, received_rx)
}

async fn serve(mut stream: TcpStream) -> Option<Received> {
    let mut reader = BufReader::new(&mut stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await.ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut content_length = 0;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).await.ok()?;
        if line.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).await.ok()?;

    let (status, response_body) = match (method.as_str(), path.as_str()) {
        ("GET", "/config") => ("200 OK", CONFIG),
        ("POST", "/config") => ("200 OK", ""),
        ("GET", "/status") => ("200 OK", STATUS),
        ("GET", "/slow") => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            ("200 OK", "{}")
        }
        _ => ("404 Not Found", "not found"),
    };

    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{response_body}",
        response_body.len()
    );
    stream.write_all(response.as_bytes()).await.ok()?;

    Some(Received {
        method,
        path,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn device_client(addr: SocketAddr) -> DeviceClient {
    let url = Url::parse(&format!("http://{addr}")).expect("invalid device url");
    DeviceClient::new(url).expect("failed to create device client")
}

fn get(endpoint: &str) -> HttpRequest {
    HttpRequest {
        method: "GET".to_string(),
        url: build_url(endpoint),
        headers: Vec::new(),
        body: Vec::new(),
    }
}

#[tokio::test]
async fn status_is_fetched_from_device() {
    let (addr, mut received) = start_mock_device().await;
    let client = device_client(addr);

    let result = client.execute(&get("/status")).await;

    let HttpResult::Ok(response) = result else {
        panic!("expected a response, got {result:?}");
    };
    assert_eq!(response.status, 200);
    assert_eq!(response.body, STATUS.as_bytes());

    let request = received.recv().await.expect("request was not recorded");
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/status");
}

#[tokio::test]
async fn non_success_status_is_passed_through() {
    let (addr, _received) = start_mock_device().await;
    let client = device_client(addr);

    let result = client.execute(&get("/nope")).await;

    assert!(matches!(result, HttpResult::Ok(response) if response.status == 404));
}

#[tokio::test]
async fn slow_device_times_out() {
    let (addr, _received) = start_mock_device().await;
    let client = device_client(addr);

    let result = client.execute(&get("/slow")).await;

    assert!(matches!(result, HttpResult::Err(HttpError::Timeout)));
}

#[tokio::test]
async fn unreachable_device_is_an_io_error() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind");
    let addr = listener.local_addr().expect("failed to get local address");
    drop(listener);

    let result = device_client(addr).execute(&get("/status")).await;

    assert!(matches!(result, HttpResult::Err(HttpError::Io(_))));
}

#[tokio::test]
async fn runtime_loads_config_and_polls_status() {
    let (addr, _received) = start_mock_device().await;
    let mut runtime = Runtime::new(device_client(addr), Script::default());

    runtime
        .dispatch(Event::Initialize)
        .expect("failed to initialize");

    tokio::time::timeout(Duration::from_secs(10), async {
        while runtime.view().status_view.is_none() {
            assert!(runtime.step().await.expect("step failed"));
        }
    })
    .await
    .expect("status was not rendered in time");

    let view = runtime.view();
    assert_eq!(view.sync_state, SyncState::Loaded);
    assert_eq!(view.firmware_version.as_deref(), Some("2.1.0"));
    assert_eq!(view.form.value_of("w_sta_ssid"), Some("rover-base"));
    let status = view.status_view.expect("status view missing");
    assert_eq!(status.uptime.as_deref(), Some("00:01:01"));
    assert_eq!(status.memory.as_deref(), Some("50% free"));

    runtime.teardown().expect("failed to tear down");
    assert!(runtime.view().poller.stopped);
}

#[tokio::test]
async fn applied_edits_are_submitted_and_page_reloads_after_restart() {
    let (addr, mut received) = start_mock_device().await;
    let edits: Configuration =
        serde_json::from_str(r#"{"w_sta_ssid":"field-office"}"#).expect("invalid edits");
    let mut runtime = Runtime::new(
        device_client(addr),
        Script {
            edits: Some(edits),
            scan: false,
        },
    );

    runtime
        .dispatch(Event::Initialize)
        .expect("failed to initialize");

    tokio::time::timeout(Duration::from_secs(20), async {
        while runtime.reloads() == 0 {
            assert!(runtime.step().await.expect("step failed"));
        }
    })
    .await
    .expect("page was not reloaded in time");

    let mut submitted = None;
    while let Ok(request) = received.try_recv() {
        if request.method == "POST" {
            submitted = Some(request);
        }
    }
    let submitted = submitted.expect("configuration was not submitted");
    assert_eq!(submitted.path, "/config");
    let payload: Configuration =
        serde_json::from_str(&submitted.body).expect("payload is not a configuration");
    assert_eq!(
        payload.get("w_sta_ssid").map(|v| v.as_text()).as_deref(),
        Some("field-office")
    );
    assert_eq!(
        payload.get("ntr_srv_active").map(|v| v.as_text()).as_deref(),
        Some("0")
    );

    runtime.teardown().expect("failed to tear down");
}
