//! A loopback rig speaking the line protocol, one request per connection.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use rigscan_common::RigEndpoint;

#[derive(Debug)]
struct RigState {
    frequency: u64,
    mode: String,
    levels: VecDeque<String>,
    default_level: String,
    recording: bool,
    requests: Vec<String>,
}

pub struct FakeRig {
    addr: SocketAddr,
    state: Arc<Mutex<RigState>>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl FakeRig {
    /// Starts a rig tuned to `frequency` in `mode` with a quiet noise floor.
    pub fn start(frequency: u64, mode: &str) -> Self {
        let listener: TcpListener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let state: Arc<Mutex<RigState>> = Arc::new(Mutex::new(RigState {
            frequency,
            mode: mode.to_string(),
            levels: VecDeque::new(),
            default_level: "-80.0".to_string(),
            recording: false,
            requests: Vec::new(),
        }));
        let shutdown: Arc<AtomicBool> = Arc::new(AtomicBool::new(false));

        let server_state: Arc<Mutex<RigState>> = state.clone();
        let server_shutdown: Arc<AtomicBool> = shutdown.clone();
        let handle: JoinHandle<()> = thread::spawn(move || {
            for stream in listener.incoming() {
                if server_shutdown.load(Ordering::Acquire) {
                    break;
                }
                if let Ok(stream) = stream {
                    serve(stream, &server_state);
                }
            }
        });

        Self {
            addr,
            state,
            shutdown,
            handle: Some(handle),
        }
    }

    /// Levels (dBFS text) returned by the next `l` requests, in order.
    pub fn with_levels(self, levels: &[&str]) -> Self {
        self.state.lock().unwrap().levels = levels.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_default_level(self, level: &str) -> Self {
        self.state.lock().unwrap().default_level = level.to_string();
        self
    }

    pub fn endpoint(&self, ordinal: u8) -> RigEndpoint {
        RigEndpoint::new("127.0.0.1", self.addr.port(), ordinal).unwrap()
    }

    pub fn frequency(&self) -> u64 {
        self.state.lock().unwrap().frequency
    }

    pub fn mode(&self) -> String {
        self.state.lock().unwrap().mode.clone()
    }

    pub fn is_recording(&self) -> bool {
        self.state.lock().unwrap().recording
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, request: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == request).count()
    }

    pub fn tuned(&self) -> Vec<u64> {
        self.requests()
            .iter()
            .filter_map(|r| r.strip_prefix("F ")?.parse().ok())
            .collect()
    }
}

impl Drop for FakeRig {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        // Wakes the accept loop so it sees the flag.
        let _ = TcpStream::connect(self.addr);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve(stream: TcpStream, state: &Mutex<RigState>) {
    let mut request: String = String::new();
    if BufReader::new(&stream).read_line(&mut request).is_err() {
        return;
    }
    let request: &str = request.trim_end();
    if request.is_empty() {
        return;
    }

    let reply: String = respond(request, &mut state.lock().unwrap());
    let mut stream: TcpStream = stream;
    let _ = stream.write_all(reply.as_bytes());
}

fn respond(request: &str, state: &mut RigState) -> String {
    state.requests.push(request.to_string());
    let (command, arg) = request.split_once(' ').unwrap_or((request, ""));

    match command {
        "F" => match arg.parse::<u64>() {
            Ok(hz) => {
                state.frequency = hz;
                "RPRT 0\n".to_string()
            }
            Err(_) => "RPRT -1\n".to_string(),
        },
        "f" => format!("{}\n", state.frequency),
        "M" => {
            state.mode = arg.to_string();
            "RPRT 0\n".to_string()
        }
        "m" => format!("{}\n15000\n", state.mode),
        "l" => {
            let level: String = state
                .levels
                .pop_front()
                .unwrap_or_else(|| state.default_level.clone());
            format!("{level}\n")
        }
        "AOS" => {
            state.recording = true;
            "RPRT 0\n".to_string()
        }
        "LOS" => {
            state.recording = false;
            "RPRT 0\n".to_string()
        }
        "u" => "0\n".to_string(),
        _ => "RPRT 1\n".to_string(),
    }
}
