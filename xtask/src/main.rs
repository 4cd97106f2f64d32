use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use fs_err as fs;
use tunewise_catalog::{Catalog, CatalogFile, load_catalog};

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by tunewise.
    PrintSchemas,
    /// Write the built-in catalog as an editable catalog file.
    ExportCatalog {
        #[arg(long, value_enum, default_value = "json")]
        format: CatalogFormat,
        /// Output file; stdout when omitted.
        #[arg(long)]
        out: Option<Utf8PathBuf>,
    },
    /// Load a catalog file and report whether it is valid.
    CheckCatalog { path: Utf8PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CatalogFormat {
    Json,
    Toml,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", tunewise_types::schema::TUNEWISE_REQUEST_V1);
            println!("{}", tunewise_types::schema::TUNEWISE_REPORT_V1);
            println!("{}", tunewise_types::schema::TUNEWISE_CATALOG_V1);
            println!("{}", tunewise_types::schema::TUNEWISE_RUN_V1);
        }
        Command::ExportCatalog { format, out } => {
            let catalog = Catalog::try_builtin().context("validate built-in catalog")?;
            let text = export_catalog(&catalog, format)?;
            match out {
                Some(path) => {
                    fs::write(&path, text).with_context(|| format!("write {path}"))?;
                    println!("wrote {path}");
                }
                None => print!("{text}"),
            }
        }
        Command::CheckCatalog { path } => {
            let catalog = load_catalog(&path).with_context(|| format!("check {path}"))?;
            println!("{path}: {} modifications", catalog.len());
        }
    }
    Ok(())
}

fn export_catalog(catalog: &Catalog, format: CatalogFormat) -> anyhow::Result<String> {
    let file = CatalogFile::from_catalog(catalog);
    let mut text = match format {
        CatalogFormat::Json => {
            serde_json::to_string_pretty(&file).context("serialize catalog as JSON")?
        }
        CatalogFormat::Toml => toml::to_string_pretty(&file).context("serialize catalog as TOML")?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}
