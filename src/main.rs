use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use carbon_preaudit::ai::credentials::CredentialManager;
use carbon_preaudit::ai::{AuditResponse, ErrorBody};
use carbon_preaudit::{
    config, init_tracing, AuditBackend, AuditError, Document, FunctionAuditor, GatewayAuditor,
    LocalAuditor, RetryHint,
};

const USAGE: &str = "usage: carbon-preaudit [--remote | --function] <file>...
       carbon-preaudit store-key <VAR> <KEY>";

enum Mode {
    Local,
    Remote,
    Function,
}

#[tokio::main]
async fn main() -> ExitCode {
    config::load_dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.first().map(String::as_str) == Some("store-key") {
        return match (args.get(1), args.get(2)) {
            (Some(var), Some(key)) => match CredentialManager::store_api_key(var, key) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            },
            _ => usage(),
        };
    }

    let mut mode = Mode::Local;
    let mut paths = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--remote" => mode = Mode::Remote,
            "--function" => mode = Mode::Function,
            "-h" | "--help" => return usage(),
            _ => paths.push(PathBuf::from(arg)),
        }
    }
    if paths.is_empty() {
        return usage();
    }

    match run(mode, &paths).await {
        Ok(response) => match serde_json::to_string_pretty(&response) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("failed to render result: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(err) => report_error(&err),
    }
}

async fn run(mode: Mode, paths: &[PathBuf]) -> Result<AuditResponse, AuditError> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        documents.push(Document::from_path(path).await?);
    }

    let backend: Box<dyn AuditBackend> = match mode {
        Mode::Local => {
            let catalog = config::load_catalog().unwrap_or_else(|e| {
                tracing::error!(error = %e, "Invalid issue catalog, using builtin");
                carbon_preaudit::IssueCatalog::builtin()
            });
            Box::new(LocalAuditor::new(Arc::new(catalog)))
        }
        Mode::Remote => Box::new(GatewayAuditor::from_env()?),
        Mode::Function => Box::new(FunctionAuditor::from_env()?),
    };

    tracing::debug!(backend = backend.name(), files = documents.len(), "Starting audit");
    let result = backend.audit(&documents).await?;
    Ok(AuditResponse::from(result))
}

fn report_error(err: &AuditError) -> ExitCode {
    if let Ok(json) = serde_json::to_string(&ErrorBody::from(err)) {
        println!("{}", json);
    }
    let hint = match err.retry_hint() {
        RetryHint::RetryNow => "retry now",
        RetryHint::RetryLater => "retry later",
        RetryHint::ContactBilling => "add credits before retrying",
        RetryHint::NotRetryable => "fix the request before retrying",
    };
    eprintln!("audit failed (status {}): {}", err.status_code(), hint);
    ExitCode::FAILURE
}

fn usage() -> ExitCode {
    eprintln!("{}", USAGE);
    ExitCode::from(2)
}
