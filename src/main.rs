use caf::commands::plumbing::cat_file::cat_file;
use caf::commands::plumbing::ls_tree::ls_tree;
use caf::commands::porcelain::commit::commit;
use caf::commands::porcelain::init::init;
use caf::commands::porcelain::log::{LogOptions, log};
use caf::commands::porcelain::tag::{create_tag, delete_tag, list_tags};
use caf::commands::{Console, execute};
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "CAF_LOG";

#[derive(Parser)]
#[command(
    name = "caf",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A content-addressed file snapshot store",
    long_about = "caf records snapshots of a working directory as immutable, \
    content-addressed commits and lets you name them with tags.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "The working directory of the repository (defaults to the current directory)"
    )]
    repo: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates the .caf metadata directory in the working directory. \
        Running it in an existing repository leaves its history untouched."
    )]
    Init,
    #[command(
        name = "commit",
        about = "Record the working directory as a new commit",
        long_about = "This command snapshots every file of the working directory and records \
        the snapshot on top of the current HEAD."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
        #[arg(long, help = "The author name (defaults to $CAF_AUTHOR_NAME, then $USER)")]
        author: Option<String>,
    },
    #[command(name = "log", about = "Show the commit history, newest first")]
    Log {
        #[arg(long, help = "Show each commit on a single line")]
        oneline: bool,
    },
    #[command(
        name = "create-tag",
        about = "Create a tag for a commit",
        long_about = "This command names a commit with a tag. The commit can be given as a full \
        commit ID, HEAD (or @), or the name of an existing tag."
    )]
    CreateTag {
        #[arg(index = 1, help = "The name of the tag")]
        name: String,
        #[arg(index = 2, default_value = "HEAD", help = "The commit to tag")]
        commit: String,
    },
    #[command(name = "tags", about = "List all tags")]
    Tags,
    #[command(name = "delete-tag", about = "Delete a tag")]
    DeleteTag {
        #[arg(index = 1, help = "The name of the tag")]
        name: String,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the decoded content of an object. The object can be \
        given as a full object ID or as a commit reference."
    )]
    CatFile {
        #[arg(index = 1, help = "The object ID or commit reference")]
        object: String,
    },
    #[command(name = "ls-tree", about = "List the files recorded by a commit")]
    LsTree {
        #[arg(index = 1, default_value = "HEAD", help = "The commit to list")]
        commit: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let working_dir = match cli.repo {
        Some(path) => path,
        None => std::env::current_dir()?,
    };

    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();
    let mut console = Console::new(&mut stdout, &mut stderr);

    let status = execute(&mut console, |console| match &cli.command {
        Commands::Init => init(console, &working_dir),
        Commands::Commit { message, author } => {
            commit(console, &working_dir, message, author.as_deref())
        }
        Commands::Log { oneline } => log(console, &working_dir, LogOptions { oneline: *oneline }),
        Commands::CreateTag { name, commit } => {
            create_tag(console, &working_dir, name, Some(commit.as_str()))
        }
        Commands::Tags => list_tags(console, &working_dir),
        Commands::DeleteTag { name } => delete_tag(console, &working_dir, name),
        Commands::CatFile { object } => cat_file(console, &working_dir, object),
        Commands::LsTree { commit } => ls_tree(console, &working_dir, Some(commit.as_str())),
    });

    drop(console);
    stdout.flush()?;
    std::process::exit(status)
}
