use gcs_bucket_admin::admin::{BucketAdmin, Error};

const KEY_FILE: &str = "key.json";
const BUCKET_NAME: &str = "yuska-test-bucket";
const TEST_FILE: &str = "test.txt";

async fn run() -> Result<(), Error> {
    let admin = BucketAdmin::new(KEY_FILE, BUCKET_NAME).await?;

    admin.show_objects().await?;
    admin.show_public_url(TEST_FILE);
    // admin.upload_marker_file("", TEST_FILE).await?;
    // admin.show_bucket_access_control().await?;
    // admin.create_folder("public").await?;
    // admin.set_folder_public("public").await?;
    // BucketAdmin::create_public_uniform_bucket(KEY_FILE, "yuska-public-bucket").await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(error) = run().await {
        tracing::error!("ERROR: {error}");
        std::process::exit(1);
    }
}
