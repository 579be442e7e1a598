use std::{thread, time::Duration};

use anyhow::{Context, Result};
use bbuffer::spsc::{self, Receiver, Sender};
use clap::Parser;
use rand::Rng;
use tokio::{join, task};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;

use cli::Cli;

/// Extra pause drawn from `0..jitter_us`.
fn jitter(jitter_us: u64) -> Duration {
    if jitter_us == 0 {
        return Duration::ZERO;
    }
    Duration::from_micros(rand::thread_rng().gen_range(0..jitter_us))
}

fn pause(base_ms: u64, jitter_us: u64) {
    thread::sleep(Duration::from_millis(base_ms) + jitter(jitter_us));
}

fn random_letter() -> char {
    char::from(rand::thread_rng().gen_range(b'a'..=b'z'))
}

fn send_loop(tx: Sender<char>, items: usize, delay_ms: u64, jitter_us: u64) -> usize {
    let mut sent = 0;
    for _ in 0..items {
        let c = random_letter();
        info!(item = %c, pending = tx.len(), "put");
        if tx.send(c).is_err() {
            warn!("receiver hung up");
            break;
        }
        sent += 1;
        pause(delay_ms, jitter_us);
    }
    sent
}

fn recv_loop(rx: Receiver<char>, delay_ms: u64, jitter_us: u64) -> usize {
    let mut received = 0;
    for c in &rx {
        info!(item = %c, "get");
        println!("{c}");
        received += 1;
        pause(delay_ms, jitter_us);
    }
    received
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_thread_names(true))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bbuffer=info")),
        )
        .init();

    let cli = Cli::parse();
    let (tx, rx) = spsc::channel::<char>(cli.capacity).context("failed to create buffer")?;
    info!(capacity = cli.capacity, items = cli.items, "starting producer and consumer");

    let jitter_us = cli.jitter_us;
    let producer = task::spawn_blocking(move || {
        send_loop(tx, cli.items, cli.producer_delay_ms, jitter_us)
    });
    let consumer = task::spawn_blocking(move || recv_loop(rx, cli.consumer_delay_ms, jitter_us));

    let (sent, received) = join!(producer, consumer);
    let sent = sent.context("producer panicked")?;
    let received = received.context("consumer panicked")?;

    info!(sent, received, "done");
    Ok(())
}
