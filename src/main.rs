use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

use jvm_options::{MetadataMatcher, OptionTables, OptionsDocument};

/// Translate JVM option tokens to structured values and back
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Option tables YAML file (defaults to the bundled tables)
    #[arg(short, long, global = true)]
    tables: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse JVM option tokens into a structured document
    Parse {
        /// Options file name, e.g. jvm-server.options
        file_name: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,

        /// Tokens to parse, e.g. -Xmx4G -server
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },

    /// Render one value back into JVM flag syntax
    Render {
        /// Options file name, e.g. jvm-server.options
        file_name: String,

        /// Option key, e.g. -Xmx
        #[arg(allow_hyphen_values = true)]
        key: String,

        /// Value to render
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Render a YAML options document back into JVM tokens, one per line
    Emit {
        /// Options file name, e.g. jvm-server.options
        file_name: String,

        /// YAML document produced by `parse`
        document: PathBuf,
    },

    /// List the namespaces in the loaded tables
    Namespaces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn load_tables(path: Option<&Path>) -> Result<OptionTables> {
    match path {
        Some(path) => OptionTables::from_yaml_file(path)
            .wrap_err_with(|| format!("Failed to load option tables '{}'", path.display())),
        None => OptionTables::builtin().wrap_err("Failed to load bundled option tables"),
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging, RUST_LOG takes precedence over --log-level
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    // Load the option tables, bundled unless --tables is given
    let tables = load_tables(args.tables.as_deref())?;

    match &args.command {
        Command::Parse { file_name, format, tokens } => {
            let matcher = MetadataMatcher::new(&tables, file_name)?;
            // Unrecognized tokens land in additional-jvm-options
            let document = OptionsDocument::from_tokens(&matcher, tokens.iter().map(String::as_str));
            info!(
                "Parsed {} tokens: {} options, {} additional",
                tokens.len(),
                document.options.len(),
                document.additional_jvm_options.len()
            );

            match format {
                Format::Yaml => print!("{}", serde_yaml::to_string(&document)?),
                Format::Json => println!("{}", serde_json::to_string_pretty(&document)?),
            }
        }
        Command::Render { file_name, key, value } => {
            let matcher = MetadataMatcher::new(&tables, file_name)?;
            let metadata = matcher
                .find_by_key(key)
                .ok_or_else(|| eyre!("No option '{}' in namespace '{}'", key, matcher.namespace()))?;

            // An empty rendering means the flag is omitted
            let rendered = metadata.output(value);
            if rendered.is_empty() {
                info!("{} with value '{}' renders to nothing", key, value);
            } else {
                println!("{}", rendered);
            }
        }
        Command::Emit { file_name, document } => {
            let matcher = MetadataMatcher::new(&tables, file_name)?;
            // Open and parse the YAML document
            let file = File::open(document)
                .wrap_err_with(|| format!("Failed to open document '{}'", document.display()))?;
            let document: OptionsDocument = serde_yaml::from_reader(file)
                .wrap_err_with(|| format!("Failed to parse document '{}'", document.display()))?;

            // Known options first, then the verbatim tokens
            for token in document.to_tokens(&matcher) {
                println!("{}", token);
            }
        }
        Command::Namespaces => {
            for namespace in tables.namespace_names() {
                println!("{}", namespace);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from([
            "jvm-options",
            "parse",
            "jvm-server.options",
            "-Xmx4G",
            "-server",
            "-Djava.net.preferIPv4Stack=true",
        ]);

        assert_eq!(args.tables, None);
        assert_eq!(args.log_level, "warn");
        match args.command {
            Command::Parse { file_name, format, tokens } => {
                assert_eq!(file_name, "jvm-server.options");
                assert_eq!(format, Format::Yaml);
                assert_eq!(tokens, vec!["-Xmx4G", "-server", "-Djava.net.preferIPv4Stack=true"]);
            }
            other => panic!("Expected parse command, got {:?}", other),
        }
    }

    #[test]
    fn test_render_args() {
        let args = Args::parse_from([
            "jvm-options",
            "--tables",
            "tables.yaml",
            "render",
            "jvm-server.options",
            "-Xmx",
            "4G",
        ]);

        assert_eq!(args.tables, Some(PathBuf::from("tables.yaml")));
        match args.command {
            Command::Render { file_name, key, value } => {
                assert_eq!(file_name, "jvm-server.options");
                assert_eq!(key, "-Xmx");
                assert_eq!(value, "4G");
            }
            other => panic!("Expected render command, got {:?}", other),
        }
    }

    #[test]
    fn test_json_format_arg() {
        let args = Args::parse_from([
            "jvm-options",
            "parse",
            "jvm-server.options",
            "--format",
            "json",
            "-Xss256k",
        ]);

        match args.command {
            Command::Parse { format, tokens, .. } => {
                assert_eq!(format, Format::Json);
                assert_eq!(tokens, vec!["-Xss256k"]);
            }
            other => panic!("Expected parse command, got {:?}", other),
        }
    }

    #[test]
    fn test_load_tables() {
        assert!(load_tables(None).is_ok());

        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "namespaces:\n  custom-options:\n    \"-Xmx\":\n      builder_type: string\n      value_type: suppressed_value"
        )
        .unwrap();
        let tables = load_tables(Some(file.path())).unwrap();
        assert_eq!(tables.namespace_names(), vec!["custom-options"]);

        assert!(load_tables(Some(Path::new("/nonexistent/tables.yaml"))).is_err());
    }
}
