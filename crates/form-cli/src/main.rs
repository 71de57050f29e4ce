use clap::{Parser, Subcommand, ValueEnum};
use form_spec::{
    FormDefinition, FormValues, lint, render_json, render_text, resolve_visibility,
    validate_field, validate_submission,
};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Form logic CLI",
    long_about = "Evaluates conditional visibility and validation rules of a form document against a set of values"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Print which fields are visible for the given values.
    Visibility {
        /// Path to the form definition JSON.
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        /// Path to the form values JSON object.
        #[arg(long, value_name = "VALUES")]
        values: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Run submit-time validation over every visible field.
    Validate {
        /// Path to the form definition JSON.
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        /// Path to the form values JSON object.
        #[arg(long, value_name = "VALUES")]
        values: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Validate a single value against one field's advanced rules.
    Check {
        /// Path to the form definition JSON.
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        /// Id of the field to check.
        #[arg(long, value_name = "FIELD")]
        field: String,
        /// Field value as JSON; bare words are read as strings.
        #[arg(long, value_name = "VALUE")]
        value: String,
    },
    /// Report conditions and rules that would silently fail closed.
    Lint {
        /// Path to the form definition JSON.
        #[arg(long, value_name = "FORM")]
        form: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the JSON schema of the form definition document.
    Schema,
}

fn main() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Visibility {
            form,
            values,
            format,
        } => run_visibility(form, values, format),
        Command::Validate {
            form,
            values,
            format,
        } => run_validate(form, values, format),
        Command::Check { form, field, value } => run_check(form, field, value),
        Command::Lint { form, format } => run_lint(form, format),
        Command::Schema => run_schema(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_form(path: &Path) -> CliResult<FormDefinition> {
    let document = fs::read_to_string(path)?;
    let form = FormDefinition::from_json_str(&document)?;
    tracing::debug!(form_id = %form.id, fields = form.fields.len(), "loaded form");
    Ok(form)
}

fn load_values(path: &Path) -> CliResult<FormValues> {
    let document = fs::read_to_string(path)?;
    match serde_json::from_str(&document)? {
        Value::Object(values) => Ok(values),
        other => Err(format!("form values must be a JSON object, got {}", other).into()),
    }
}

fn run_visibility(form_path: PathBuf, values_path: PathBuf, format: OutputFormat) -> CliResult<()> {
    let form = load_form(&form_path)?;
    let values = load_values(&values_path)?;
    let visibility = resolve_visibility(&form, &values);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&visibility)?),
        OutputFormat::Text => {
            for field in &form.fields {
                let visible = visibility.get(&field.id).copied().unwrap_or(true);
                println!(
                    "{} {}",
                    field.id,
                    if visible { "visible" } else { "hidden" }
                );
            }
        }
    }
    Ok(())
}

fn run_validate(form_path: PathBuf, values_path: PathBuf, format: OutputFormat) -> CliResult<()> {
    let form = load_form(&form_path)?;
    let values = load_values(&values_path)?;
    let report = validate_submission(&form, &values);

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&render_json(&form, &report))?
        ),
        OutputFormat::Text => println!("{}", render_text(&form, &report)),
    }

    if report.valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn run_check(form_path: PathBuf, field_id: String, raw_value: String) -> CliResult<()> {
    let form = load_form(&form_path)?;
    let field = form
        .field(&field_id)
        .ok_or_else(|| format!("form '{}' has no field '{}'", form.id, field_id))?;
    let value: Value = serde_json::from_str(&raw_value).unwrap_or(Value::String(raw_value));

    let result = validate_field(field, &value);
    if result.is_valid {
        println!("{}: valid", field.id);
        return Ok(());
    }

    println!("{}: invalid", field.id);
    for message in &result.error_messages {
        println!("  {}", message);
    }
    Err("validation failed".into())
}

fn run_lint(form_path: PathBuf, format: OutputFormat) -> CliResult<()> {
    let form = load_form(&form_path)?;
    let issues = lint(&form);

    match format {
        OutputFormat::Json => {
            let entries: Vec<Value> = issues.iter().map(|issue| issue.to_json()).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "form_id": form.id,
                    "issues": entries,
                }))?
            );
        }
        OutputFormat::Text => {
            if issues.is_empty() {
                println!("No issues found in '{}'.", form.id);
            }
            for issue in &issues {
                println!("{}", issue);
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(format!("{} issue(s) found", issues.len()).into())
    }
}

fn run_schema() -> CliResult<()> {
    let schema = schemars::schema_for!(FormDefinition);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
