use clap::{Parser, Subcommand};
use folio::document::{Document, JsonFileStore};
use folio::error::LibraryError;
use folio::fragment::markdown_to_markup;
use folio::library::DocumentLibrary;
use folio::richtext::html_converter::markup_to_text;
use folio::settings::Settings;
use folio::templates::TEMPLATES;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Structured editing for academic documents", long_about = None)]
struct Args {
    /// Document collection file (defaults to the configured store)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all documents
    Ls,
    /// List the available templates
    Templates,
    /// Create a document from a template
    New {
        /// Template key
        #[arg(default_value = "blank")]
        template: String,
    },
    /// Print a document
    Show {
        id: String,
        /// Print plain text instead of markup
        #[arg(long)]
        text: bool,
    },
    /// Merge a fragment into a document by its leading heading
    Merge {
        id: String,
        /// Fragment file; reads stdin when omitted
        file: Option<PathBuf>,
        /// Treat the fragment as Markdown
        #[arg(long)]
        markdown: bool,
    },
    /// Append a fragment to the end of a document
    Insert {
        id: String,
        /// Fragment file; reads stdin when omitted
        file: Option<PathBuf>,
        /// Treat the fragment as Markdown
        #[arg(long)]
        markdown: bool,
    },
    /// Append a manual page break
    Break { id: String },
    /// Delete a document
    Rm { id: String },
    /// Fill an empty collection with demo documents
    Seed,
}

type Library = DocumentLibrary<JsonFileStore>;

fn open_library(store: Option<PathBuf>) -> Result<Library, LibraryError> {
    let settings = Settings::load();
    let path = store.unwrap_or_else(|| settings.storage_path());
    DocumentLibrary::open(JsonFileStore::new(path), settings)
}

fn read_fragment(file: Option<PathBuf>, markdown: bool) -> Result<String, LibraryError> {
    let raw = match file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    Ok(if markdown {
        markdown_to_markup(&raw)
    } else {
        raw
    })
}

fn print_summary(doc: &Document) {
    println!(
        "{}  {}  ({} words, {})",
        doc.id,
        doc.title,
        doc.word_count,
        doc.last_modified.format("%Y-%m-%d %H:%M")
    );
}

fn cmd_ls(library: &Library) -> Result<(), LibraryError> {
    for doc in library.list_documents() {
        print_summary(doc);
    }
    Ok(())
}

fn cmd_templates() -> Result<(), LibraryError> {
    for template in TEMPLATES {
        println!("{:<12} {}", template.key, template.title);
    }
    Ok(())
}

fn cmd_new(library: &mut Library, template: &str) -> Result<(), LibraryError> {
    let doc = library.create_document(template)?;
    println!("{}", doc.id);
    Ok(())
}

fn cmd_show(library: &Library, id: &str, text: bool) -> Result<(), LibraryError> {
    let session = library.open_document(id)?;
    if text {
        println!("{}", markup_to_text(&session.markup()));
    } else {
        println!("{}", session.markup());
    }
    eprintln!(
        "{} words, {} page(s)",
        session.word_count(),
        session.page_count()
    );
    Ok(())
}

fn cmd_merge(library: &mut Library, id: &str, fragment: &str) -> Result<(), LibraryError> {
    let mut session = library.open_document(id)?;
    match session.smart_update(fragment) {
        Some(applied) => println!(
            "replaced section at block {} ({} blocks)",
            applied.heading_index,
            applied.blocks.len()
        ),
        None => println!("no matching section, appended"),
    }
    library.close(session)
}

fn cmd_insert(library: &mut Library, id: &str, fragment: &str) -> Result<(), LibraryError> {
    let mut session = library.open_document(id)?;
    session.insert_text(fragment);
    library.close(session)
}

fn cmd_break(library: &mut Library, id: &str) -> Result<(), LibraryError> {
    let mut session = library.open_document(id)?;
    session.insert_page_break();
    println!("{} page(s)", session.page_count());
    library.close(session)
}

fn cmd_seed(library: &mut Library) -> Result<(), LibraryError> {
    let added = library.seed_demo_documents()?;
    if added == 0 {
        println!("collection is not empty, nothing seeded");
    } else {
        println!("seeded {} documents", added);
    }
    Ok(())
}

fn run(args: Args) -> Result<(), LibraryError> {
    let mut library = open_library(args.store)?;

    match args.command.unwrap_or(Commands::Ls) {
        Commands::Ls => cmd_ls(&library),
        Commands::Templates => cmd_templates(),
        Commands::New { template } => cmd_new(&mut library, &template),
        Commands::Show { id, text } => cmd_show(&library, &id, text),
        Commands::Merge { id, file, markdown } => {
            let fragment = read_fragment(file, markdown)?;
            cmd_merge(&mut library, &id, &fragment)
        }
        Commands::Insert { id, file, markdown } => {
            let fragment = read_fragment(file, markdown)?;
            cmd_insert(&mut library, &id, &fragment)
        }
        Commands::Break { id } => cmd_break(&mut library, &id),
        Commands::Rm { id } => library.delete_document(&id),
        Commands::Seed => cmd_seed(&mut library),
    }
}

fn main() {
    folio::logging::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
