use clap::Parser;
use invoice_extract::utils::{logger, validation::Validate};
use invoice_extract::{make_inferencer, CliArgs, InvoiceWorkflow, Outcome, Result};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = CliArgs::parse();

    logger::init_cli_logger(args.debug);
    tracing::debug!("CLI args: {:?}", args);

    if let Err(e) = run(&args).await {
        tracing::debug!(
            "❌ Invoice processing failed: {} (Category: {:?})",
            e,
            e.category()
        );

        eprintln!("Error: {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(args: &CliArgs) -> Result<()> {
    let settings = args.load_settings()?;
    settings.validate()?;

    let inferencer = make_inferencer(args.backend, &settings, &args.overrides())?;
    tracing::debug!("Connecting to {}", inferencer.base_url());

    let workflow = InvoiceWorkflow::new(Arc::from(inferencer)).with_model(args.model.clone());

    tracing::debug!(
        "--- Testing invoice detection on: {} ---",
        args.image_path.display()
    );
    let outcome = workflow.run(&args.image_path).await?;
    match &outcome {
        Outcome::Invoice(properties) => {
            tracing::debug!("--- Extracted Data ---");
            tracing::debug!("Date: {:?}", properties.invoice_date);
            tracing::debug!("Total: {:?}", properties.total_amount);
            tracing::debug!("Currency: {:?}", properties.currency);
        }
        Outcome::NotInvoice => tracing::debug!("Image is not an invoice."),
    }

    println!("{}", outcome.to_json());
    Ok(())
}
