// Entrypoint for the CLI application.
// - Keeps `main` small: create an API client and hand it to the chat loop.
// - Returning `anyhow::Result` makes a missing API key exit with code 1
//   and a diagnostic, before any prompt is shown.

use gemini_browser::{api::GeminiClient, ui::chat_loop};

fn main() -> anyhow::Result<()> {
    // A `.env` in the working directory may hold GEMINI_API_KEY.
    dotenvy::dotenv().ok();

    // Silent unless RUST_LOG is set.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let api = GeminiClient::from_env()?;

    // Runs until the user types `exit` or `quit`.
    chat_loop(api)?;
    Ok(())
}
