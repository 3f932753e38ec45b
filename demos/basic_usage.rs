//! Basic usage of the Dropbox storage service
//!
//! This example demonstrates:
//! - Registering the storage module from launch configuration
//! - Creating a folder and uploading files
//! - Listing, downloading and deleting
//!
//! Provide a token via `DBX_STORAGE__ACCESSTOKEN` (or `.env`), then run:
//! cargo run --example basic_usage

use dbx_client::StorageService;
use dbx_module::{LaunchConfig, Registry, StorageModule};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("Dropbox Storage - Basic Usage Example\n");

    let registry = Registry::new();
    StorageModule::new().configure(&registry, &LaunchConfig::load()?)?;
    let storage = registry.require::<dyn StorageService>()?;

    // ==================== Account ====================

    let account = storage.account_info().await?;
    println!("Signed in as {} <{}>", account.display_name, account.email);

    // ==================== Folders ====================

    let folder = "/dbx-basic-usage";
    println!("\nCreating folder '{}'...", folder);
    match storage.create_folder(folder).await {
        Ok(created) => println!("   created {}", created.path),
        Err(e) if e.is_conflict() => println!("   already exists"),
        Err(e) => return Err(e.into()),
    }

    // ==================== Upload ====================

    let dir = tempfile::tempdir()?;
    for i in 1..=3 {
        let local = dir.path().join(format!("file{}.txt", i));
        std::fs::write(&local, format!("Content of file {}", i))?;

        let remote = format!("{}/file{}.txt", folder, i);
        match storage.upload(&local, &remote).await {
            Ok(file) => println!("   uploaded {} ({} bytes, rev {})", file.path, file.size, file.revision),
            Err(e) => println!("   {}: {}", remote, e),
        }
    }

    // ==================== List & Download ====================

    println!("\nListing {}...", folder);
    let listing = storage.list(folder).await?;
    for entry in &listing {
        println!("   - {}", entry.path());
    }

    let text = storage
        .download_as_string(&format!("{}/file1.txt", folder))
        .await?;
    println!("\nfile1.txt says: {}", text);

    // ==================== Cleanup ====================

    storage.delete(folder).await?;
    println!("\nDeleted {}", folder);

    Ok(())
}
