//! End-to-end walkthrough against a running SDRDB server
//!
//! Run with: cargo run --example demo -p sdrdb -- [ENDPOINT]
//!
//! ENDPOINT defaults to unix:///tmp/sdrdb.sock. Creates a scratch database,
//! stores a batch of concepts, runs every query kind and drops the database
//! again.

use sdrdb::{Endpoint, SdrdbClient};

const WIDTH: u64 = 1000;
const CONCEPTS: u64 = 200;
const TRAITS_PER_CONCEPT: u64 = 20;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let spec = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "unix:///tmp/sdrdb.sock".to_string());
    let endpoint: Endpoint = spec.parse()?;

    println!("connecting to {}", endpoint);
    let client = SdrdbClient::new(endpoint);

    client.create_database("demo", WIDTH).await?;
    println!("created database demo (width {})", WIDTH);

    // Deterministic sparse patterns so consecutive concepts overlap.
    for i in 0..CONCEPTS {
        let traits: Vec<u64> = (0..TRAITS_PER_CONCEPT)
            .map(|j| (i * 37 + j * 53) % WIDTH)
            .collect();
        client.put("demo", &traits).await?;
    }
    println!("stored {} concepts", CONCEPTS);

    let score = client.query_similarity("demo", 1, 2).await?;
    println!("similarity of 1 and 2: {}", score);

    let score = client.query_usimilarity("demo", 1, &[2, 3, 4]).await?;
    println!("usimilarity of 1 against {{2, 3, 4}}: {}", score);

    let ranked = client.query_closest("demo", 10, 1).await?;
    println!("closest to 1:");
    for (id, score) in &ranked {
        println!("  {} (score {})", id, score);
    }

    let ranked = client.query_closest_weighted("demo", 10, 1).await?;
    println!("weighted closest to 1: {} results", ranked.len());

    let ids = client.query_matching("demo", &[37, 90]).await?;
    println!("concepts carrying traits 37 and 90: {:?}", ids);

    let ids = client.query_matchingx("demo", 5, &[37, 90]).await?;
    println!("first {} of them: {:?}", ids.len(), ids);

    let ack = client.update("demo", 1, &[37, 90, 143]).await?;
    println!("update acknowledged: {}", ack);

    client.drop_database("demo").await?;
    println!("dropped database demo");

    Ok(())
}
