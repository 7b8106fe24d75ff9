mod api;
mod app;
mod clipboard;
mod commands;
mod config;
mod history;
mod logging;
mod recording;
mod studio;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(e) = app::run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
