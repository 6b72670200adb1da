/*
 *  tests/run_loop.rs
 *
 *  End to end iterations over the mock and loopback collaborators
 *
 *  vestaglove - controller log display
 *	(c) 2026 vestaglove contributors
 */

use std::net::Ipv4Addr;
use std::time::Duration;

use embedded_graphics::pixelcolor::{Rgb565, Rgb888};
use embedded_graphics::prelude::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use vestaglove::config::{self, Cli};
use vestaglove::display::drivers::mock::MockDriver;
use vestaglove::display::FrameCanvas;
use vestaglove::logsink::LineLog;
use vestaglove::peer::{HttpTransport, MockTransport};
use vestaglove::runloop::{Phase, RunLoop};
use vestaglove::wifi::MockStation;

fn raw(r: u8, g: u8, b: u8) -> [u8; 2] {
    Rgb565::from(Rgb888::new(r, g, b)).into_storage().to_le_bytes()
}

#[tokio::test(start_paused = true)]
async fn test_iteration_paints_log_on_panel() {
    let settings = config::from_cli(&Cli::default()).unwrap();

    let driver = MockDriver::new_with_size(240, 240);
    let probe = driver.state();
    let canvas = FrameCanvas::new(Box::new(driver), settings.display.rotate_deg).unwrap();
    let sink = LineLog::with_retention(canvas, settings.text_layout(), settings.log_retention);

    let transport = MockTransport::new();
    transport.route("http://192.168.4.9:10000/discover", r#"{"service":"vesta"}"#);
    transport.route("http://192.168.4.9:10000/mode", r#"{"mode":"idle"}"#);
    let station = MockStation::new(Ipv4Addr::new(192, 168, 4, 20), true, false);

    let mut run_loop = RunLoop::new(station, transport, sink, settings.run_settings());
    run_loop.run_iteration().await;

    assert_eq!(run_loop.phase(), &Phase::Connecting);
    let lines: Vec<&str> = run_loop.sink().lines().map(|l| l.body.as_str()).collect();
    assert!(lines.contains(&"Found vesta at 192.168.4.9!"));
    assert!(lines.contains(&"No handler for mode idle"));
    assert_eq!(lines.len(), 20);

    let state = probe.lock().unwrap();
    assert_eq!(state.init_count, 1);
    assert!(state.frames_written > 100);
    let frame = state.last_frame.as_ref().unwrap();
    assert_eq!(frame.len(), 240 * 240 * 2);
    // corner pixel is the log background
    assert_eq!(&frame[..2], &raw(255, 89, 158));
    assert!(frame.chunks(2).any(|px| px == raw(255, 255, 255)));
}

/// Minimal controller: answers each request once and closes.
async fn serve_controller(listener: TcpListener, service: &'static str, mode: &'static str) {
    loop {
        let Ok((mut stream, _)) = listener.accept().await else { return };
        let mut buf = vec![0u8; 2048];
        let mut read = 0;
        while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf[read..]).await {
                Ok(0) | Err(_) => break,
                Ok(n) => read += n,
            }
        }
        let request = String::from_utf8_lossy(&buf[..read]);
        let path = request.split_whitespace().nth(1).unwrap_or("/");
        let (status, body) = match path {
            "/discover" => ("200 OK", format!(r#"{{"service":"{service}"}}"#)),
            "/mode" => ("200 OK", format!(r#"{{"mode":"{mode}"}}"#)),
            _ => ("404 Not Found", "{}".to_string()),
        };
        let reply = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(reply.as_bytes()).await;
        let _ = stream.shutdown().await;
    }
}

#[tokio::test]
async fn test_discovers_loopback_controller_over_http() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(serve_controller(listener, "vesta", "party"));

    let settings = config::from_cli(&Cli {
        port: Some(port),
        driver: Some(config::DriverKind::Headless),
        ..Default::default()
    })
    .unwrap();
    let mut run = settings.run_settings();
    run.idle_period = Duration::from_millis(10);

    let canvas = FrameCanvas::new(Box::new(MockDriver::new_with_size(240, 240)), 180).unwrap();
    let sink = LineLog::with_retention(canvas, settings.text_layout(), 400);
    let station = MockStation::new(Ipv4Addr::new(127, 0, 0, 77), true, false);
    let transport = HttpTransport::new().unwrap();

    let mut run_loop = RunLoop::new(station, transport, sink, run);
    tokio::time::timeout(Duration::from_secs(60), run_loop.run_iteration())
        .await
        .unwrap();

    let lines: Vec<&str> = run_loop.sink().lines().map(|l| l.body.as_str()).collect();
    assert!(lines.contains(&"Found vesta at 127.0.0.1!"));
    assert!(lines.contains(&"Current mode: party"));
    // .1 comes right after 151..=255
    assert_eq!(lines.iter().filter(|l| l.starts_with("Attempting ")).count(), 106);
    server.abort();
}
