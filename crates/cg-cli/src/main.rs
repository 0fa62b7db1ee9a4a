//! CropGuard CLI

use anyhow::Context;
use cg_core::catalog::{display_name, get_recommendation, is_known, known_labels};
use cg_core::report::{self, DiagnosisReport, ReportFormat};
use cg_core::weather::assess_disease_risk;
use cg_core::{Diagnoser, ImageNormalizer};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "cg-scan")]
#[command(about = "Crop leaf disease diagnosis tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Diagnose a leaf photo
    Diagnose {
        /// Path to the image
        #[arg(short, long)]
        image: PathBuf,

        /// ONNX model file
        #[arg(short, long, default_value = "models/crop_disease_model.onnx")]
        model: PathBuf,

        /// Label mapping JSON ({"label": index})
        #[arg(short, long, default_value = "models/class_indices.json")]
        labels: PathBuf,

        /// Output format (text, json, markdown, html)
        #[arg(short, long, default_value = "text")]
        output: String,

        /// Output file (defaults to stdout)
        #[arg(short = 'O', long)]
        output_file: Option<PathBuf>,
    },

    /// Show what the normalizer produces for an image
    Normalize {
        /// Path to the image
        #[arg(short, long)]
        image: PathBuf,
    },

    /// Show treatment advice for one label, or list all known labels
    Catalog {
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Evaluate the weather disease-risk rules
    Risk {
        /// Temperature in Celsius
        #[arg(short, long, allow_hyphen_values = true)]
        temperature: f64,

        /// Relative humidity in percent
        #[arg(long)]
        humidity: f64,

        /// Condition group (Rain, Clear, Clouds, ...)
        #[arg(short, long, default_value = "Clear")]
        condition: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set subscriber: {}", e);
    }

    let result = match cli.command {
        Commands::Diagnose { image, model, labels, output, output_file } => {
            cmd_diagnose(image, model, labels, output, output_file)
        }
        Commands::Normalize { image } => cmd_normalize(image),
        Commands::Catalog { label } => {
            cmd_catalog(label);
            Ok(())
        }
        Commands::Risk { temperature, humidity, condition } => {
            cmd_risk(temperature, humidity, &condition);
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn cmd_diagnose(
    image: PathBuf,
    model: PathBuf,
    labels: PathBuf,
    output: String,
    output_file: Option<PathBuf>,
) -> anyhow::Result<()> {
    info!("Diagnosing: {}", image.display());

    let bytes = std::fs::read(&image)
        .with_context(|| format!("reading {}", image.display()))?;
    let tensor = ImageNormalizer::default().decode(&bytes)?;

    let diagnoser = Diagnoser::load(&model, &labels)?;
    let prediction = diagnoser.diagnose(&tensor)?;
    let info = get_recommendation(&prediction.label);

    info!("Predicted {} ({:.2}%)", prediction.label, prediction.confidence);

    let content = if output.eq_ignore_ascii_case("text") {
        let mut text = String::new();
        text.push_str(&format!("\nDiagnosis\n{}\n", "=".repeat(50)));
        text.push_str(&format!("Disease:    {}\n", display_name(&prediction.label)));
        text.push_str(&format!("Confidence: {:.1}%\n", prediction.confidence));
        text.push_str(&format!(
            "Severity:   {} (score {})\n",
            info.severity,
            info.severity.display_score()
        ));
        text.push_str(&format!("\n{}\n\nTreatment:\n", info.description));
        for treatment in info.treatment {
            text.push_str(&format!("  - {}\n", treatment));
        }
        text
    } else {
        let format: ReportFormat = output.parse()?;
        let report = DiagnosisReport {
            username: std::env::var("USER").unwrap_or_else(|_| "cli".to_string()),
            disease_name: display_name(&prediction.label),
            confidence: prediction.confidence,
            severity: info.severity,
            description: info.description.to_string(),
            treatments: info.treatment.iter().map(|t| t.to_string()).collect(),
            generated_at: chrono::Utc::now(),
        };
        report::generate_report(&report, format)?
    };

    if let Some(out_path) = output_file {
        std::fs::write(&out_path, &content)
            .with_context(|| format!("writing {}", out_path.display()))?;
        info!("Report written to: {}", out_path.display());
    } else {
        println!("{}", content);
    }

    Ok(())
}

fn cmd_normalize(path: PathBuf) -> anyhow::Result<()> {
    let bytes = std::fs::read(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    let decoded = image::load_from_memory(&bytes)?;
    let normalizer = ImageNormalizer::default();
    let tensor = normalizer.normalize(&decoded);

    println!("\nNormalized Input\n{}", "=".repeat(50));
    println!("File: {}", path.display());
    println!("Original: {}x{} ({:?})", decoded.width(), decoded.height(), decoded.color());
    println!("Tensor shape: {:?}", tensor.shape());
    println!("Value range: [{:.4}, {:.4}]", tensor.min(), tensor.max());

    Ok(())
}

fn cmd_catalog(label: Option<String>) {
    match label {
        Some(label) => {
            let info = get_recommendation(&label);
            println!("\n{}\n{}", display_name(&label), "=".repeat(50));
            if !is_known(&label) {
                println!("(not in catalog)");
            }
            println!("Severity: {} (score {})", info.severity, info.severity.display_score());
            println!("{}", info.description);
            println!("\nTreatment:");
            for treatment in info.treatment {
                println!("  - {}", treatment);
            }
        }
        None => {
            println!("\nKnown Diseases\n{}", "=".repeat(50));
            for label in known_labels() {
                println!("  {:<24} {}", label, get_recommendation(label).severity);
            }
        }
    }
}

fn cmd_risk(temperature: f64, humidity: f64, condition: &str) {
    let risk = assess_disease_risk(temperature, humidity, condition);
    println!("Disease Risk: {}", risk.level);
    println!("{}", risk.message);
}
