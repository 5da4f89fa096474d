use hammer::{parse_target, BenchConfig, BenchReport};
use std::time::Duration;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();
    let config = BenchConfig::builder()
        .url(parse_target("http://localhost:3000").unwrap())
        .requests(10_000)
        .concurrency(300)
        .time_limit(Duration::from_secs(5))
        .build();

    let summary = hammer::run(&config).await.unwrap();

    let report = BenchReport::from(&summary);
    println!("{report:#?}");
}
