#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use clap::Parser;
use contactdesk_http::serve;

#[derive(Parser)]
#[command(name = "contactdesk", about = "Contact-form backend")]
struct Cli {
    #[arg(long, env = "CONTACTDESK_BIND_ADDR", default_value = "127.0.0.1:8080")]
    bind_addr: String,
    #[arg(long, env = "CONTACTDESK_DATA_DIR", default_value = "./data")]
    data_dir: String,
    /// Document store address: memory:// or http(s)://host:port
    #[arg(long, env = "CONTACTDESK_STORE_URL", default_value = "memory://")]
    store_url: String,
    /// Connection attempts before giving up
    #[arg(long, env = "CONTACTDESK_CONNECT_MAX_ATTEMPTS", default_value = "5")]
    max_attempts: u32,
    /// Pause between connection attempts
    #[arg(long, env = "CONTACTDESK_CONNECT_RETRY_DELAY_MS", default_value = "2000")]
    retry_delay_ms: u64,
    #[arg(long, env = "CONTACTDESK_PUBLIC_DIR", default_value = "./public")]
    public_dir: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    std::env::set_var("CONTACTDESK_BIND_ADDR", &cli.bind_addr);
    std::env::set_var("CONTACTDESK_DATA_DIR", &cli.data_dir);
    std::env::set_var("CONTACTDESK_STORE_URL", &cli.store_url);
    std::env::set_var("CONTACTDESK_CONNECT_MAX_ATTEMPTS", cli.max_attempts.to_string());
    std::env::set_var("CONTACTDESK_CONNECT_RETRY_DELAY_MS", cli.retry_delay_ms.to_string());
    std::env::set_var("CONTACTDESK_PUBLIC_DIR", &cli.public_dir);

    // The service is useless without its store: any startup failure,
    // including exhausted connection retries, ends the process.
    if let Err(e) = serve().await {
        eprintln!("FATAL: {}", e);
        std::process::exit(1);
    }
}
