//! Debug script to inspect the audio sources of one episode page
//!
//! Usage: cargo run -p orpheus-core --example debug_detail -- <episode-url>

use orpheus_core::parser::{extract_audio_candidates, parse_detail_page, parse_frame_audio};
use orpheus_core::url::BASE_URL;
use orpheus_core::{OrpheusClient, PageSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let url = std::env::args()
        .nth(1)
        .ok_or("usage: debug_detail <episode-url>")?;

    let client = OrpheusClient::new()?;
    let html = client.fetch_page(&url).await?;

    std::fs::write("debug_detail.html", &html)?;
    println!("HTML saved to debug_detail.html");

    let candidates = extract_audio_candidates(&html, BASE_URL);
    println!("\n=== {} player snippet(s) ===", candidates.len());
    for candidate in &candidates {
        println!("{} ({:?})", candidate.url, candidate.description);
    }

    let page = parse_detail_page(&html, BASE_URL)?;
    println!("\nTitle: {}", page.title);

    if let Some(frame_src) = &page.frame_src {
        println!("Frame: {}", frame_src);
        let frame_html = client.fetch_page(frame_src).await?;
        println!("Frame audio: {:?}", parse_frame_audio(&frame_html));
    }

    Ok(())
}
