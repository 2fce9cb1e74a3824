use clap::{Arg, Command};
use fitness_sharks::config::ClientOptions;
use fitness_sharks::probe::find_working_backend;
use fitness_sharks::ApiClient;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("fitness-sharks-probe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Check which Fitness Sharks backend URL is reachable")
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("Base URL to test first (overrides FITNESS_SHARKS_API_URL)")
                .takes_value(true),
        )
        .arg(
            Arg::new("origin")
                .long("origin")
                .value_name("URL")
                .help("Origin used to resolve relative candidates such as /api")
                .takes_value(true),
        )
        .arg(
            Arg::new("probe-only")
                .long("probe-only")
                .help("Skip the configured URL and only walk the fallback list"),
        )
        .get_matches();

    let mut options = match ClientOptions::from_env() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    if let Some(url) = matches.value_of("url") {
        options = options.with_base_url(url);
    }
    if let Some(origin) = matches.value_of("origin") {
        options = options.with_origin(origin);
    }

    let outcome = if matches.is_present("probe-only") {
        find_working_backend(&options).await.map(|client| {
            println!("Working backend: {}", client.base_url());
        })
    } else {
        match ApiClient::new(options) {
            Ok(client) => client.test_connection().await.map(|(client, report)| {
                println!("{}", report.summary());
                println!("Working backend: {}", client.base_url());
            }),
            Err(e) => Err(e),
        }
    };

    if let Err(e) = outcome {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
