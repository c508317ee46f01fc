use std::env;
use std::io;
use std::path::Path;
use std::process::ExitCode;

use price_eng::csv::{
    CsvError, ReportRow, read_customers, read_requests, read_rules, write_report,
};
use price_eng::{CustomerAttributes, PriceResolver, PriceRule};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: price-eng <rules.csv> <customers.csv> <requests.csv>";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [rules, customers, requests] = args.as_slice() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    for path in [rules, customers, requests] {
        if !path.ends_with(".csv") {
            warn!(path, "input file seems to not be a csv file");
        }
    }

    match run(Path::new(rules), Path::new(customers), Path::new(requests)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Log and drop rows that failed to load
fn skip_invalid<T>(result: Result<T, CsvError>) -> Option<T> {
    result.inspect_err(|e| warn!("{e}")).ok()
}

async fn run(rules: &Path, customers: &Path, requests: &Path) -> Result<(), CsvError> {
    let rules: Vec<PriceRule> = read_rules(rules)?.filter_map(skip_invalid).collect();
    let customers: CustomerAttributes = read_customers(customers)?.filter_map(skip_invalid).collect();
    let resolver = PriceResolver::new(rules, customers);

    let requests = read_requests(requests)?;
    let (request_sender, request_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for request in requests {
            if request_sender.send(request).await.is_err() {
                break;
            }
        }
    });

    // rejected rows stay in the report so it lines up with the input
    let mut report = Vec::new();
    let mut stream = ReceiverStream::new(request_receiver);
    while let Some(request) = stream.next().await {
        let row = match request {
            Ok(request) => ReportRow::from(resolver.resolve_request(&request)),
            Err(rejected) => {
                warn!("{rejected}");
                ReportRow::from(rejected)
            }
        };
        report.push(row);
    }

    write_report(&report, io::stdout().lock())
}
