#[tokio::main]
async fn main() {
    if let Err(e) = docqa::run().await {
        eprintln!("docqa failed to start: {e}");
        std::process::exit(1);
    }
}
