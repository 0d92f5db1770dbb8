//! richpage CLI: paginate a plain-text file and print a page summary

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use richpage::{Editor, LineMeasurer, PageNumberFormat, PageNumberPosition, Result};

#[derive(Parser)]
#[command(name = "richpage")]
#[command(version)]
#[command(about = "Paginate a plain-text document onto A4 pages", long_about = None)]
struct Args {
    /// Input text file (stdin if not specified)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Header text for every page
    #[arg(long, value_name = "TEXT")]
    header: Option<String>,

    /// Footer text for every page
    #[arg(long, value_name = "TEXT")]
    footer: Option<String>,

    /// Page number style
    #[arg(long, value_enum, default_value = "arabic")]
    numbering: Numbering,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Numbering {
    /// 1, 2, 3
    Arabic,
    /// I, II, III
    Roman,
    /// a, b, c
    Letters,
}

impl From<Numbering> for PageNumberFormat {
    fn from(numbering: Numbering) -> Self {
        match numbering {
            Numbering::Arabic => PageNumberFormat::Arabic,
            Numbering::Roman => PageNumberFormat::Roman,
            Numbering::Letters => PageNumberFormat::Letters,
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut editor = Editor::new();
    match &args.input {
        Some(path) => editor.load_plain_text(BufReader::new(File::open(path)?))?,
        None => editor.load_plain_text(io::stdin().lock())?,
    }

    if let Some(header) = &args.header {
        editor.headers.set_header(header, false);
    }
    if let Some(footer) = &args.footer {
        editor.headers.set_footer(footer, false);
    }
    editor.headers.set_page_number_format(args.numbering.into());
    editor.headers.set_show_page_numbers(true);
    editor
        .headers
        .set_page_number_position(PageNumberPosition::BottomCenter);

    let pages = editor.paginate(&LineMeasurer::default());
    log::info!("laid out {} page(s)", pages.len());
    println!(
        "{} paragraph(s), {} word(s), {} char(s), {} page(s)",
        editor.document.paragraph_count(),
        editor.word_count(),
        editor.char_count(),
        pages.len()
    );
    for page in &pages {
        println!(
            "page {:>3}  offsets {:>6}..{:<6}  paragraphs {}..{}  header {:?}  footer {:?}",
            page.index,
            page.content.start,
            page.content.end,
            page.paragraphs.start,
            page.paragraphs.end,
            page.header,
            page.footer
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let args = Args::try_parse_from([
            "richpage",
            "notes.txt",
            "--header",
            "Draft",
            "--numbering",
            "roman",
        ])
        .unwrap();
        assert_eq!(args.input, Some(PathBuf::from("notes.txt")));
        assert_eq!(args.header.as_deref(), Some("Draft"));
        assert!(args.footer.is_none());
        assert_eq!(PageNumberFormat::from(args.numbering), PageNumberFormat::Roman);
    }

    #[test]
    fn test_default_numbering_is_arabic() {
        let args = Args::try_parse_from(["richpage"]).unwrap();
        assert!(args.input.is_none());
        assert!(args.numbering == Numbering::Arabic);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        assert!(Args::try_parse_from(["richpage", "--foo", "notes.txt"]).is_err());
        assert!(Args::try_parse_from(["richpage", "notes.txt", "--header"]).is_err());
        assert!(Args::try_parse_from(["richpage", "--numbering", "hex"]).is_err());
    }
}
