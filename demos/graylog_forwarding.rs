//! Graylog forwarding example
//!
//! Starts a local UDP listener standing in for a Graylog input, registers
//! the asynchronous GELF hook and prints what arrives.
//!
//! Run with: cargo run --example graylog_forwarding

use flate2::read::GzDecoder;
use split_logging::prelude::*;
use split_logging::{infoln, warnln};
use std::io::Read;
use std::net::UdpSocket;
use std::time::Duration;

fn main() -> Result<()> {
    let listener = UdpSocket::bind("127.0.0.1:0")?;
    listener.set_read_timeout(Some(Duration::from_secs(2)))?;
    let port = listener.local_addr()?.port().to_string();

    facade::split_logs();
    facade::add_async_graylog_hook(
        "127.0.0.1",
        &port,
        LogContext::new()
            .with_field("app", "billing")
            .with_field("env", "staging"),
    )?;

    infoln!("info stays local");
    warnln!("disk low on", "/var/lib");
    facade::logger().flush()?;

    let mut buf = vec![0u8; 65536];
    let len = listener.recv(&mut buf)?;
    let mut json = String::new();
    GzDecoder::new(&buf[..len]).read_to_string(&mut json)?;

    println!("\nGELF message received by the listener:\n{}", json);
    Ok(())
}
