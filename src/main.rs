#[tokio::main]
async fn main() {
    portfolio::start_server().await;
}
