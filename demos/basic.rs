//! Basic example demonstrating the Looker API client.
//!
//! Run with:
//! ```
//! LOOKER_BASE_URL=https://example.looker.com:19999/api/ \
//! LOOKER_API_CLIENT_ID=... LOOKER_API_CLIENT_SECRET=... \
//! cargo run --example basic
//! ```

use std::time::Duration;

use lookerapi::{Context, ListParams, LookerClient, LookerConfig};

#[tokio::main]
async fn main() -> lookerapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Authenticate with credentials from the environment
    println!("Connecting to Looker...");
    let client = LookerClient::connect(LookerConfig::from_env()).await?;
    let session = client.current_session().await?;
    println!("Connected to {} ({} workspace)", client.base_url(), session.workspace);

    // Bound the rest of the run to one minute
    let client = client.with_context(Context::with_timeout(Duration::from_secs(60)));

    // Walk model sets page by page
    println!("\n--- Model sets ---");
    let mut pages = client.model_sets().pages(&ListParams::with_limit(25))?;
    while let Some(page) = pages.next_page().await? {
        for set in &page {
            println!(
                "  {} {:<30} built_in={}",
                set.id.as_deref().unwrap_or("-"),
                set.name.as_deref().unwrap_or("-"),
                set.is_built_in()
            );
        }
    }

    // Everything at once
    println!("\n--- Roles ---");
    let (roles, _) = client.roles().list().await?;
    for role in roles {
        println!(
            "  {} {}",
            role.id.as_deref().unwrap_or("-"),
            role.name.as_deref().unwrap_or("-")
        );
    }

    // Projects need the dev workspace for git details
    println!("\n--- Projects (dev) ---");
    match client.create_dev_connection().await {
        Ok((dev, _)) => {
            let (projects, _) = dev.projects().list().await?;
            for project in projects {
                println!(
                    "  {} git={}",
                    project.id.as_deref().unwrap_or("-"),
                    project.git_remote_url.as_deref().unwrap_or("-")
                );
            }
            dev.logout().await?;
        }
        Err(e) => println!("  dev workspace unavailable: {e}"),
    }

    client.logout().await?;
    println!("\nDone!");
    Ok(())
}
