use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "bbuffer")]
#[command(author, version, about = "Producer/consumer demo over a bounded buffer")]
pub struct Cli {
    /// Number of slots in the buffer
    #[arg(short, long, default_value_t = 10, env = "BBUFFER_CAPACITY")]
    pub capacity: usize,

    /// Number of items the producer sends before hanging up
    #[arg(short = 'n', long, default_value_t = 10, env = "BBUFFER_ITEMS")]
    pub items: usize,

    /// Pause after each put, in milliseconds
    #[arg(long, default_value_t = 1500)]
    pub producer_delay_ms: u64,

    /// Pause after each get, in milliseconds
    #[arg(long, default_value_t = 750)]
    pub consumer_delay_ms: u64,

    /// Exclusive upper bound of the random extra pause, in microseconds
    #[arg(long, default_value_t = 100)]
    pub jitter_us: u64,
}
