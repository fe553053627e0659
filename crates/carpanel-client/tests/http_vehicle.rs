//! End-to-end tests of `HttpVehicle` and `Panel` against a fake vehicle server

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use carpanel_client::{HttpVehicle, Panel, PanelOptions, Surface, VehicleApi, DEFAULT_TIMEOUT};
use carpanel_core::{Command, CommandName, ControlView, PanelError, UploadTarget};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct FakeCar {
    commands: Mutex<Vec<Value>>,
    uploads: Mutex<Vec<(String, String, usize)>>,
    offline: AtomicBool,
    stopped: AtomicBool,
}

async fn car(State(car): State<Arc<FakeCar>>, Json(body): Json<Value>) -> impl IntoResponse {
    car.commands.lock().unwrap().push(body.clone());
    match body["execute"].as_str() {
        Some("jump") | None => (
            StatusCode::BAD_REQUEST,
            "\"jump\" - invalid command".to_string(),
        )
            .into_response(),
        Some(command) => {
            if command == "stop" {
                car.stopped.store(true, Ordering::SeqCst);
            }
            Json(json!({ "command": command })).into_response()
        }
    }
}

async fn car_status(State(car): State<Arc<FakeCar>>) -> impl IntoResponse {
    if car.offline.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "vehicle offline").into_response();
    }
    let stop = car.stopped.load(Ordering::SeqCst) as u8;
    // firmware style: numeric flags, no auto field
    Json(json!({
        "forward": 1 - stop,
        "back": 0,
        "stop": stop,
        "speed": 140,
        "speed_left": 140,
        "speed_right": 138,
        "turn": 90
    }))
    .into_response()
}

async fn upload(
    State(car): State<Arc<FakeCar>>,
    Path((kind, name)): Path<(String, String)>,
    body: Bytes,
) -> impl IntoResponse {
    car.uploads
        .lock()
        .unwrap()
        .push((kind, name.clone(), body.len()));
    format!("File `{}` {} bytes uploaded successfully.", name, body.len())
}

async fn spawn_car() -> (Arc<FakeCar>, String) {
    let car = Arc::new(FakeCar::default());
    let app = Router::new()
        .route("/car", post(self::car))
        .route("/car_status", get(car_status))
        .route("/upload/{kind}/{name}", post(upload))
        .with_state(car.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (car, format!("http://{}", addr))
}

#[derive(Default)]
struct LogSurface {
    views: Mutex<Vec<ControlView>>,
    alerts: Mutex<Vec<String>>,
}

impl Surface for LogSurface {
    fn show_speed(&self, _speed: u8) {}

    fn render(&self, view: &ControlView) {
        self.views.lock().unwrap().push(view.clone());
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }

    fn set_file_name(&self, _target: UploadTarget, _file_name: &str) {}

    fn set_uploading(&self, _target: UploadTarget, _uploading: bool) {}
}

#[tokio::test]
async fn test_send_command_posts_json() {
    let (car, url) = spawn_car().await;
    let vehicle = HttpVehicle::new(&url, DEFAULT_TIMEOUT).unwrap();

    let reply = vehicle
        .send_command(&Command::Speed(99).to_request())
        .await
        .unwrap();

    assert_eq!(reply.command, CommandName::Speed);
    assert_eq!(
        car.commands.lock().unwrap().clone(),
        vec![json!({"execute": "speed", "value": 99})]
    );
}

#[tokio::test]
async fn test_status_with_numeric_flags() {
    let (_car, url) = spawn_car().await;
    let vehicle = HttpVehicle::new(&url, DEFAULT_TIMEOUT).unwrap();

    let status = vehicle.fetch_status().await.unwrap();

    assert!(status.forward);
    assert!(!status.stop);
    assert!(!status.auto);
    assert_eq!(status.speed, 140);
    assert_eq!(status.speed_right, Some(138));
}

#[tokio::test]
async fn test_http_error_carries_status_and_body() {
    let (car, url) = spawn_car().await;
    car.offline.store(true, Ordering::SeqCst);
    let vehicle = HttpVehicle::new(&url, DEFAULT_TIMEOUT).unwrap();

    let err = vehicle.fetch_status().await.unwrap_err();

    assert_eq!(
        err,
        PanelError::Http {
            status: 500,
            body: "vehicle offline".to_string()
        }
    );
}

#[tokio::test]
async fn test_unreachable_vehicle_is_transport_error() {
    // bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let vehicle = HttpVehicle::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    let err = vehicle.fetch_status().await.unwrap_err();
    assert!(matches!(err, PanelError::Transport(_)));
}

#[tokio::test]
async fn test_upload_path_and_reply() {
    let (car, url) = spawn_car().await;
    let vehicle = HttpVehicle::new(&url, DEFAULT_TIMEOUT).unwrap();

    let reply = vehicle
        .upload(UploadTarget::Html, "index.html", b"<html></html>".to_vec())
        .await
        .unwrap();

    assert_eq!(reply, "File `index.html` 13 bytes uploaded successfully.");
    assert_eq!(
        car.uploads.lock().unwrap().clone(),
        vec![("html".to_string(), "index.html".to_string(), 13)]
    );
}

#[tokio::test]
async fn test_panel_over_http() {
    let (car, url) = spawn_car().await;
    let surface = Arc::new(LogSurface::default());
    let panel = Panel::new(
        HttpVehicle::new(&url, DEFAULT_TIMEOUT).unwrap(),
        surface.clone(),
        PanelOptions::default(),
    );

    panel.init().await.unwrap();
    assert_eq!(panel.displayed_speed(), 140);

    panel.dispatch(Command::Stop).await.unwrap();
    let state = panel.state().await;
    assert!(state.stop);
    assert!(state.command_stop);

    car.offline.store(true, Ordering::SeqCst);
    assert!(panel.refresh_status().await.is_err());
    let view = surface.views.lock().unwrap().last().cloned().unwrap();
    assert_eq!(view.auto_label(), Some("vehicle offline"));
    assert!(view.enabled_controls().is_empty());
    assert!(surface.alerts.lock().unwrap().is_empty());
}
