use axum::http::StatusCode;
use potato_inventory::app::{map_request, normalize, Operation, StoreRequest};
use potato_inventory::infra::config::{self, ServerConfig, StoreConfig};
use potato_inventory::{DataApi, RestDataApi};
use std::time::Duration;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Requires env vars:\n\
           {}, {}\n\
         Optional:\n\
           {} (default: {}), {}, {}\n",
        config::SUPABASE_URL,
        config::SUPABASE_SERVICE_ROLE_KEY,
        config::POTATO_TABLE,
        config::DEFAULT_TABLE,
        config::BIND_ADDR,
        config::STORE_TIMEOUT_SECS,
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let server_config = ServerConfig::from_env()?;
    let store_config = StoreConfig::from_env();
    let creds = store_config
        .credentials()
        .map_err(|e| anyhow::anyhow!("Store configuration incomplete: {}", e))?;

    println!("> Preflight:");
    println!("  {}={}", config::SUPABASE_URL, creds.base_url);
    println!("  {}=<set>", config::SUPABASE_SERVICE_ROLE_KEY);
    println!("  table={}", creds.table);
    println!("  bind_addr={}", server_config.bind_addr);

    // Probe with the same mapping the server uses, so headers and path match exactly.
    let call = map_request(&store_config, &StoreRequest::List)
        .map_err(|e| anyhow::anyhow!("Failed to build probe request: {}", e))?;
    let timeout = server_config.store_timeout.unwrap_or(Duration::from_secs(10));
    let data_api = RestDataApi::new(Some(timeout))?;

    let outcome = data_api.execute(call).await;
    let response = normalize(Operation::List, outcome).map_err(|e| {
        anyhow::anyhow!(
            "Store probe failed ({}): {}",
            e.status_code(),
            e.body()
        )
    })?;

    let rows = response.body.as_array().map(Vec::len).unwrap_or(0);
    if response.status == StatusCode::OK {
        println!("  Store reachable, '{}' holds {} row(s).", creds.table, rows);
    }

    println!("> Preflight OK.");
    Ok(())
}
