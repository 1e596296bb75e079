pub use news_digest::worker::handler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    news_digest::setup_logging();
    lambda_runtime::run(lambda_runtime::service_fn(handler)).await
}
