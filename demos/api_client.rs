/// Example HTTP client demonstrating how to call the lookup server's debug API
///
/// Run the server first:
/// ```bash
/// cargo run --bin server
/// ```
///
/// Then run this example:
/// ```bash
/// cargo run --example api_client -- 92021
/// ```
use zipcode_lookup::AddressResult;
use zipcode_lookup::server::HealthResponse;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url =
        std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let zip_codes: Vec<String> = match std::env::args().skip(1).collect::<Vec<_>>() {
        args if args.is_empty() => ["92021", "99999", "abc"].map(String::from).to_vec(),
        args => args,
    };
    let client = reqwest::Client::new();

    println!("=== ZIP Code Lookup API Client Demo ===\n");

    println!("1. Checking server health...");
    let health: HealthResponse = client
        .get(format!("{}/health", base_url))
        .send()
        .await?
        .json()
        .await?;
    println!("   Server status: {}", health.status);
    println!("   Version: {}\n", health.version);

    println!("2. Looking up ZIP codes...");
    for zip_code in &zip_codes {
        let url = format!("{}/api/test/lookup/{}", base_url, zip_code);
        match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let result: AddressResult = response.json().await?;
                println!("   [{}] {}", zip_code, result.status());
                if result.is_success() {
                    println!("     Address: {}", result.formatted_address());
                    if let Some((lat, lon)) = result.coordinates() {
                        println!("     Coordinates: {}, {}", lat, lon);
                    }
                    println!("     Matches: {}", result.places().len());
                } else if let Some(message) = result.error_message() {
                    println!("     {}", message);
                }
            }
            Ok(response) => println!("   [{}] HTTP {}", zip_code, response.status()),
            Err(e) => println!("   [{}] Request failed: {}", zip_code, e),
        }
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
