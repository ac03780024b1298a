//! Example client for the checkdecode server API.
//!
//! Usage: `cargo run -p checkdecode-server --example api_client -- checklist.docx`

use reqwest::multipart::{Form, Part};
use reqwest::Client;

const SERVER_URL: &str = "http://localhost:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: api_client <checklist.docx>"))?;
    let client = Client::new();

    println!("1. Health Check:");
    let resp = client.get(format!("{SERVER_URL}/health")).send().await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    println!("2. Decode {path}:");
    let bytes = tokio::fs::read(&path).await?;
    let part = Part::bytes(bytes)
        .file_name("checklist.docx")
        .mime_str("application/vnd.openxmlformats-officedocument.wordprocessingml.document")?;
    let resp = client
        .post(format!("{SERVER_URL}/decode"))
        .multipart(Form::new().part("file", part))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    let body: serde_json::Value = resp.json().await?;
    if let Some(report) = body.get("report_markdown").and_then(|v| v.as_str()) {
        println!("{report}");
    } else {
        println!("Body: {body}");
    }
    println!();

    println!("3. Reload Reference Data:");
    let resp = client
        .post(format!("{SERVER_URL}/reference/reload"))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);

    Ok(())
}
