use anyhow::Result;

use hhat::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = hh_auth::load_settings()?;

    // Logging is initialized in App::run() so it never writes to the terminal
    App::new(settings).run().await?;

    Ok(())
}
