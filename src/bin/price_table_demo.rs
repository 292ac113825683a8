//! Demo that runs the pipeline over a bundled listing fixture and
//! geography sample and prints the per-region table (stdout only).
//!
//! Usage: `price_table_demo [level]` where level is `state`, `city`,
//! `neighborhood` or the upstream `1`/`2`/`3` values. Env overrides:
//! `LISTING_FEED_PATH`, `GEOJSON_PATH`, `ATLAS_METRICS=1`.

use std::path::Path;

use listing_price_atlas::geography::GeographyFile;
use listing_price_atlas::ingest::providers::json_feed::JsonFeedProvider;
use listing_price_atlas::ingest::types::ListingProvider;
use listing_price_atlas::metrics::Metrics;
use listing_price_atlas::{config, pipeline, HierarchyLevel};

const SAMPLE_FEED: &str = r#"[
    {"title": "T3 Alvalade", "price": "269,000 €", "location": "Alvalade, Lisboa, Lisboa", "rooms": "T3", "date_scraped": "2024-02-01", "page": 1},
    {"title": "T2 Benfica", "price": "231,000 €", "location": "Benfica, Lisboa, Lisboa", "rooms": "T2", "date_scraped": "2024-02-01", "page": 1},
    {"title": "T2 Foz", "price": "198,500 €", "location": "Foz do Douro, Porto, Porto", "rooms": "T2", "date_scraped": "2024-02-01", "page": 2},
    {"title": "Moradia Estoril", "price": "Preço sob consulta", "location": "Estoril, Cascais, Lisboa", "rooms": "T4", "date_scraped": "2024-02-01", "page": 2},
    {"title": "T1 Baixa", "price": "175,000 €", "location": "Baixa, Porto, Porto", "rooms": "T1", "date_scraped": "2024-01-15", "page": 3}
]"#;

const SAMPLE_GEO: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"NAME_1": "Lisboa", "NAME_2": "Lisboa", "NAME_3": "Alvalade"}, "geometry": null},
        {"type": "Feature", "properties": {"NAME_1": "Lisboa", "NAME_2": "Lisboa", "NAME_3": "Benfica"}, "geometry": null},
        {"type": "Feature", "properties": {"NAME_1": "Lisboa", "NAME_2": "Cascais", "NAME_3": "Estoril"}, "geometry": null},
        {"type": "Feature", "properties": {"NAME_1": "Porto", "NAME_2": "Porto", "NAME_3": "Foz do Douro"}, "geometry": null},
        {"type": "Feature", "properties": {"NAME_1": "Porto", "NAME_2": "Porto", "NAME_3": "Baixa"}, "geometry": null},
        {"type": "Feature", "properties": {"NAME_1": "Faro", "NAME_2": "Faro", "NAME_3": "Sé"}, "geometry": null}
    ]
}"#;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();
    let _ = dotenvy::dotenv();

    let level = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<HierarchyLevel>().ok())
        .unwrap_or(HierarchyLevel::State);

    let metrics = matches!(std::env::var("ATLAS_METRICS").as_deref(), Ok("1")).then(Metrics::init);

    let rules = config::load_rules_default().expect("loading normalize rules");

    let provider = match std::env::var("LISTING_FEED_PATH") {
        Ok(p) => JsonFeedProvider::from_path(Path::new(&p)).expect("reading listing feed"),
        Err(_) => JsonFeedProvider::from_fixture_str(SAMPLE_FEED),
    };
    let providers: Vec<Box<dyn ListingProvider>> = vec![Box::new(provider)];

    let geography = match std::env::var("GEOJSON_PATH") {
        Ok(p) => GeographyFile::load(Path::new(&p)).expect("reading geojson"),
        Err(_) => GeographyFile::parse(SAMPLE_GEO).expect("parsing bundled geojson"),
    };

    let table = pipeline::run(&providers, &geography, level, &rules).await;

    match table.snapshot_date {
        Some(date) => println!(
            "Average prices by {} (data as of {})",
            table.level,
            date.format("%Y-%m-%d")
        ),
        None => println!("Average prices by {} (no dated snapshot)", table.level),
    }
    for row in &table.rows {
        println!("{:<30} {:>12.2}", row.region, row.avg_price);
    }
    if table.degraded {
        println!("(degraded: canonical region source unavailable)");
    }

    let d = &table.diagnostics;
    println!(
        "fetched {} | excluded {} | malformed {} | undated {} | unattributed {} | unknown regions {}",
        d.fetched, d.excluded_on_request, d.malformed_price, d.undated, d.unattributed, d.unknown_regions
    );

    if let Some(m) = metrics {
        println!("{}", m.render());
    }

    println!("price-table-demo done");
}
