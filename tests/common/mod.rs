#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

/// Serves `requests` connections, answering each with its own request target as the body.
pub fn echo_server(requests: usize) -> String {
    serve(requests, "200 OK", None)
}

/// Serves `requests` connections with a fixed status and body.
pub fn status_server(requests: usize, status: &'static str, body: &'static str) -> String {
    serve(requests, status, Some(body))
}

fn serve(requests: usize, status: &'static str, body: Option<&'static str>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for stream in listener.incoming().take(requests) {
            let Ok(stream) = stream else { continue };
            respond(stream, status, body);
        }
    });

    format!("http://{}/streetview", addr)
}

fn respond(mut stream: TcpStream, status: &str, body: Option<&str>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
            break;
        }
    }

    let target = request_line.split_whitespace().nth(1).unwrap_or("");
    let body = body.unwrap_or(target);
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).unwrap();
    stream.flush().unwrap();
}

/// A port with nothing listening on it.
pub fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/streetview", addr)
}
