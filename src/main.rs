use anyhow::Result;
use clap::{Parser, Subcommand};
use zextract::areas::extractor::{Extractor, ExtractorOptions};

#[derive(Parser)]
#[command(
    name = "zextract",
    version = "0.1.0",
    about = "An extractor for classic Unix .Z and .tar.Z files",
    long_about = "This tool decodes classic Unix compress (.Z) streams and unpacks \
    .tar.Z archives, with the LZW decoder and tar reader implemented from scratch.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "extract",
        about = "Extract every .Z file found in a directory",
        long_about = "This command scans a directory for .Z files, decompresses each one, \
        and unpacks .tar.Z archives entry by entry into the target directory."
    )]
    Extract {
        #[arg(index = 1, default_value = ".", help = "The directory to scan for .Z files")]
        path: String,
        #[arg(short, long, help = "Target directory (defaults to <path>/extracted)")]
        target: Option<String>,
        #[arg(long, help = "Scan subdirectories as well")]
        recursive: bool,
        #[arg(long, help = "Abort the whole batch on the first failure")]
        strict: bool,
        #[arg(long, help = "Print the content of extracted files")]
        preview: bool,
    },
    #[command(
        name = "list",
        about = "List what .Z files in a directory would extract to",
        long_about = "This command decodes each discovered .Z file in memory and prints \
        its decompressed size, or its archive entries, without writing anything."
    )]
    List {
        #[arg(index = 1, default_value = ".", help = "The directory to scan for .Z files")]
        path: String,
        #[arg(long, help = "Scan subdirectories as well")]
        recursive: bool,
    },
    #[command(
        name = "cat",
        about = "Decompress a single .Z file to stdout",
        long_about = "This command decompresses one .Z file and writes the raw decoded \
        bytes to standard output, like zcat."
    )]
    Cat {
        #[arg(index = 1, help = "The .Z file to decompress")]
        file: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Extract {
            path,
            target,
            recursive,
            strict,
            preview,
        } => {
            let options = ExtractorOptions {
                recursive: *recursive,
                strict: *strict,
                preview: *preview,
            };
            let mut extractor = Extractor::new(
                path,
                target.as_deref(),
                options,
                Box::new(std::io::stdout()),
            )?;
            extractor.extract_all()
        }
        Commands::List { path, recursive } => {
            let options = ExtractorOptions {
                recursive: *recursive,
                ..Default::default()
            };
            let mut extractor =
                Extractor::new(path, None, options, Box::new(std::io::stdout()))?;
            extractor.list()
        }
        Commands::Cat { file } => {
            let mut extractor = Extractor::new(
                ".",
                None,
                ExtractorOptions::default(),
                Box::new(std::io::stdout()),
            )?;
            extractor.cat(file)
        }
    }
}
