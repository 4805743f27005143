use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use report_fonts::fonts::{self, BuiltinFamily, ResolvedFonts, UnavailableReason};
use report_fonts::specimen::{self, SpecimenOptions};
use report_fonts::FontConfig;

/// Resolves the report font and renders font specimens.
///
/// The custom family is read from `Arial.ttf` and `Arial Bold.ttf` in the working directory,
/// or in the directory named by `REPORT_FONTS_DIR`. When either file is unusable the built-in
/// fallback family is used instead.
#[derive(Parser)]
#[command(author, version, about = "Report font resolution with built-in fallback")]
struct Cli {
    #[command(flatten)]
    fonts: FontArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FontArgs {
    /// Directory containing the custom font files.
    #[arg(long, global = true)]
    fonts_dir: Option<PathBuf>,

    /// Logical name of the custom family.
    #[arg(long, global = true)]
    family: Option<String>,

    /// File name of the regular weight.
    #[arg(long, global = true)]
    regular: Option<String>,

    /// File name of the bold weight.
    #[arg(long, global = true)]
    bold: Option<String>,

    /// Built-in family used when the custom fonts are unavailable (helvetica, times, courier).
    #[arg(long, global = true)]
    fallback: Option<BuiltinFamily>,
}

impl FontArgs {
    fn into_config(self) -> FontConfig {
        let mut config = FontConfig::from_env();
        if let Some(dir) = self.fonts_dir {
            config = config.with_directory(dir);
        }
        if let Some(family) = self.family {
            config = config.with_family(family);
        }
        if let Some(regular) = self.regular {
            config = config.with_regular_file(regular);
        }
        if let Some(bold) = self.bold {
            config = config.with_bold_file(bold);
        }
        if let Some(fallback) = self.fallback {
            config = config.with_fallback(fallback);
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the active font identifier.
    #[command(name = "resolve")]
    Resolve,

    /// Render a one-page specimen in the active font.
    #[command(name = "specimen")]
    Specimen {
        /// Output path of the specimen PDF.
        #[arg(long, short, default_value = "font_specimen.pdf")]
        output: PathBuf,

        /// Sample text rendered in both weights.
        #[arg(long)]
        text: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.fonts.into_config();
    let resolved = fonts::resolve(&config);

    let result = match cli.command {
        Commands::Resolve => {
            report(&resolved, &config);
            Ok(())
        }
        Commands::Specimen { output, text } => {
            let mut options = SpecimenOptions::new();
            if let Some(text) = text {
                options = options.with_sample_text(text);
            }
            specimen::write(&resolved, &options, &output).map(|()| {
                println!(
                    "Generated {} using '{}'",
                    output.display(),
                    resolved.setting()
                );
            })
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(&err);
        std::process::exit(1);
    }
}

fn report(resolved: &ResolvedFonts, config: &FontConfig) {
    println!("{}", resolved.setting());
    if let (Some(cause), Some(reason)) = (resolved.fallback_cause(), resolved.fallback_reason()) {
        eprintln!("Fallback active ({}): {}", cause, reason);
        print_error_sources(reason);
        if cause == UnavailableReason::Missing {
            if let Some(line) = missing_files_line(config) {
                eprintln!("{}", line);
            }
        }
    }
}

fn missing_files_line(config: &FontConfig) -> Option<String> {
    if fonts::custom_fonts_available(config) {
        return None;
    }

    let listed = fonts::missing_font_files(config)
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("  missing files: {}", listed))
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn names_only_the_absent_weight() {
        let dir = tempfile::tempdir().expect("create scratch font dir");
        let config = FontConfig::new().with_directory(dir.path());
        fs::write(config.regular_path(), b"present").expect("write regular");

        let line = missing_files_line(&config).expect("bold is missing");
        assert!(line.contains("Arial Bold.ttf"));
        assert!(!line.contains(&config.regular_path().display().to_string()));

        fs::write(config.bold_path(), b"present").expect("write bold");
        assert_eq!(missing_files_line(&config), None);
    }
}
