//! Interactive terminal front end for kvtodo.
//!
//! # Responsibility
//! - Parse flags, initialize logging and open the key-value store.
//! - Construct one controller and drive it from stdin line by line.

mod render;
mod session;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use kvtodo_core::db::open_db;
use kvtodo_core::{
    default_log_level, init_logging, KvGateway, MemoryKvGateway, SqliteKvGateway, TodoController,
};
use log::info;
use session::{Session, LOADING_INDICATOR};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Todo list persisted through a key-value store.
#[derive(Parser, Debug)]
#[command(name = "kvtodo", version, about, long_about = None)]
struct Args {
    /// SQLite file backing the key-value store.
    #[arg(long, default_value = "kvtodo.sqlite3")]
    db: PathBuf,

    /// Keep todos in memory only; nothing survives exit.
    #[arg(long)]
    memory: bool,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// One of trace|debug|info|warn|error.
    #[arg(long, default_value = default_log_level())]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(log_dir) = args.log_dir.as_deref() {
        init_logging(&args.log_level, log_dir)
            .map_err(|err| anyhow!("failed to initialize logging: {err}"))?;
    }

    if args.memory {
        info!("event=cli_start module=cli status=ok backend=memory");
        return run(Session::new(TodoController::new(MemoryKvGateway::new())));
    }

    let conn = open_db(&args.db)
        .with_context(|| format!("failed to open store `{}`", args.db.display()))?;
    info!("event=cli_start module=cli status=ok backend=sqlite");
    run(Session::new(TodoController::new(SqliteKvGateway::new(
        &conn,
    ))))
}

fn run<G: KvGateway>(mut session: Session<G>) -> Result<()> {
    let mut stdout = io::stdout().lock();
    let mut input = io::stdin().lock();

    writeln!(stdout, "{LOADING_INDICATOR}")?;
    stdout.flush()?;
    write_lines(&mut stdout, &session.start())?;

    let mut line = String::new();
    loop {
        write!(stdout, "{}", session.prompt())?;
        stdout.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let reply = session.handle_line(line.trim_end_matches(['\n', '\r']));
        write_lines(&mut stdout, &reply.lines)?;
        if reply.quit {
            break;
        }
    }

    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

fn write_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
