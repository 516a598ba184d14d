use std::env;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zipcode_lookup::{LocationConfig, LookupService, LookupStatus, Transport};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zipcode_lookup=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(zip_code) = args.get(1) else {
        eprintln!("Usage: {} <zip_code>", program_name(&args));
        eprintln!("  zip_code: 5-digit or ZIP+4 (e.g., 92021 or 92021-1234)");
        eprintln!("  provider settings are read from AWS_LOCATION_* / AWS_* environment variables");
        std::process::exit(1);
    };
    let zip_code = zip_code.trim();

    let config = LocationConfig::from_env().context("Invalid AWS Location Service configuration")?;
    let transport = Transport::from_config(&config).context("Failed to build provider client")?;
    let service = LookupService::new(transport);

    let result = service.lookup(zip_code).await;
    println!("Status: {}", result.status());

    match result.status() {
        LookupStatus::Success => {
            println!("Address: {}", result.formatted_address());
            match result.coordinates() {
                Some((lat, lon)) => println!("Coordinates: {}, {}", lat, lon),
                None => println!("Coordinates: N/A"),
            }
            for (idx, place) in result.places().iter().enumerate() {
                println!("\n[{}] {}", idx + 1, place.label);
                for (name, value) in [
                    ("Street Number", &place.address_number),
                    ("Street", &place.street),
                    ("City", &place.municipality),
                    ("County", &place.sub_region),
                    ("State", &place.region),
                    ("Postal Code", &place.postal_code),
                    ("Country", &place.country),
                ] {
                    if !value.is_empty() {
                        println!("  {}: {}", name, value);
                    }
                }
            }
        }
        LookupStatus::NotFound | LookupStatus::Error => {
            println!("{}", result.error_message().unwrap_or("N/A"));
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Name for the usage line; argv may be empty
fn program_name(args: &[String]) -> &str {
    args.first().map_or("zipcode-lookup", String::as_str)
}
