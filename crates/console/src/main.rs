//! `userdesk` command-line console.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use userdesk_console::shell::gate;
use userdesk_console::{
    Console, ConsoleConfig, DirectoryClient, MutationOutcome, Route, Session, Severity,
    SqliteTokenStore,
};
use userdesk_core::{UserId, UserRecord};

type Cli = Console<DirectoryClient, SqliteTokenStore>;

#[derive(Parser)]
#[command(name = "userdesk")]
#[command(about = "Browse and manage users in a remote directory")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show whether a session is stored
    Whoami,
    /// List one page of users
    Users {
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Narrow the page by name or email (case-insensitive)
        #[arg(long)]
        search: Option<String>,
    },
    /// Show a single user
    Show { id: UserId },
    /// Change a user's name or email
    Edit {
        id: UserId,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a user
    Delete {
        id: UserId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    userdesk_observability::init_from_env();
    let args = Args::parse();

    match run(args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<()> {
    let config = ConsoleConfig::from_env().context("invalid configuration")?;
    let store = SqliteTokenStore::new(config.session_db_path());
    let session = Session::restore(store)
        .await
        .context("failed to read stored session")?;
    let client = DirectoryClient::new(&config, session.handle())?;
    let mut console = Console::new(client, session);

    match command {
        Command::Login { email, password } => login(&mut console, &email, &password).await,
        Command::Logout => {
            console.sign_out().await.context("failed to clear session")?;
            println!("Signed out.");
            Ok(())
        }
        Command::Whoami => {
            if console.session().is_authenticated() {
                println!("Signed in ({})", config.api_url);
            } else {
                println!("Not signed in.");
            }
            Ok(())
        }
        Command::Users { page, search } => users(&mut console, page, search).await,
        Command::Show { id } => {
            require_session(&console)?;
            let user = console.show(id).await?;
            print_user(&user);
            Ok(())
        }
        Command::Edit {
            id,
            first_name,
            last_name,
            email,
        } => edit(&mut console, id, first_name, last_name, email).await,
        Command::Delete { id, yes } => delete(&mut console, id, yes).await,
    }
}

fn require_session(console: &Cli) -> Result<()> {
    if gate(Route::Users, console.session().is_authenticated()) != Route::Users {
        bail!("not signed in - run `userdesk login` first");
    }
    Ok(())
}

async fn login(console: &mut Cli, email: &str, password: &str) -> Result<()> {
    match console.sign_in(email, password).await {
        Route::Users => {
            println!("Signed in as {email}.");
            Ok(())
        }
        Route::Login => bail!(
            "{}",
            console.login().error().unwrap_or("login failed")
        ),
    }
}

async fn users(console: &mut Cli, page: u32, search: Option<String>) -> Result<()> {
    require_session(console)?;
    console.go_to_page(page).await?;
    if let Some(error) = console.list().last_error() {
        bail!("{}", error.message());
    }
    if let Some(query) = search {
        console.search(query);
    }

    let list = console.list();
    for user in list.filtered() {
        print_row(user);
    }
    println!("{}", list.summary());
    if list.pagination_visible() {
        let pagination = list.pagination();
        println!(
            "Page {} of {}",
            pagination.current_page(),
            pagination.total_pages()
        );
    }
    Ok(())
}

async fn edit(
    console: &mut Cli,
    id: UserId,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
) -> Result<()> {
    if first_name.is_none() && last_name.is_none() && email.is_none() {
        bail!("nothing to change - pass --first-name, --last-name or --email");
    }
    require_session(console)?;
    console.start_edit(id).await?;
    if let Some(form) = console.edit_form_mut() {
        if let Some(value) = first_name {
            form.first_name = value;
        }
        if let Some(value) = last_name {
            form.last_name = value;
        }
        if let Some(value) = email {
            form.email = value;
        }
    }
    let outcome = console.commit_edit().await?;
    report(console, outcome)
}

async fn delete(console: &mut Cli, id: UserId, yes: bool) -> Result<()> {
    require_session(console)?;
    console.start_delete(id)?;
    if !yes && !confirm(&format!("Delete user {id}?"))? {
        console.cancel_delete()?;
        println!("Cancelled.");
        return Ok(());
    }
    let outcome = console.commit_delete().await?;
    report(console, outcome)
}

fn report(console: &Cli, outcome: MutationOutcome) -> Result<()> {
    if let Some(note) = console.notifications().latest() {
        match note.severity {
            Severity::Success => println!("{}", note.message),
            Severity::Error => eprintln!("{}", note.message),
        }
    }
    match outcome {
        MutationOutcome::Committed => Ok(()),
        MutationOutcome::Failed(err) => Err(err.into()),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_row(user: &UserRecord) {
    println!("{:>4}  {:<24}  {}", user.id, user.full_name(), user.email);
}

fn print_user(user: &UserRecord) {
    println!("id:     {}", user.id);
    println!("name:   {}", user.full_name());
    println!("email:  {}", user.email);
    println!("avatar: {}", user.avatar);
}
