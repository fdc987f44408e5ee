use super::{confirm, open_store};
use crate::{
    db::{db::Db, migrations::MigrationManager},
    libs::{config::Config, messages::Message, view::View},
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct DbArgs {
    #[command(subcommand)]
    command: DbCommand,
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Connection state and schema version
    Status,
    /// Drop the cached connection and open it again
    Reconnect,
    /// Delete every vehicle and fuel entry
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Applied schema migrations
    Migrations,
}

pub async fn cmd(args: DbArgs) -> Result<()> {
    match args.command {
        DbCommand::Status => handle_status(),
        DbCommand::Reconnect => {
            let (_, mut db) = open_store()?;
            db.reconnect()?;
            msg_success!(Message::DatabaseReconnected);
            Ok(())
        }
        DbCommand::Reset { yes } => {
            if !confirm(Message::ConfirmResetDatabase, yes)? {
                return Ok(());
            }
            let (_, mut db) = open_store()?;
            db.reset()?;
            msg_success!(Message::DatabaseReset);
            Ok(())
        }
        DbCommand::Migrations => handle_migrations(),
    }
}

fn handle_status() -> Result<()> {
    let config = Config::read()?;
    let mut db = Db::from_config(&config)?;

    // Status only probes an open connection
    if let Err(e) = db.handle() {
        msg_error!(e);
    }
    let status = db.status();
    View::database_status(&db.location().to_string(), &status)?;
    Ok(())
}

fn handle_migrations() -> Result<()> {
    let (_, mut db) = open_store()?;
    let manager = db.migration_manager().clone();
    let handle = db.handle()?;

    msg_print!(Message::DatabaseVersion {
        current: MigrationManager::current_version(&handle.conn)?,
        latest: manager.latest_version(),
    });
    if manager.needs_migration(&handle.conn)? {
        msg_info!(Message::DatabaseNeedsUpdate);
    } else {
        msg_info!(Message::DatabaseUpToDate);
    }

    let history = MigrationManager::history(&handle.conn)?;
    if !history.is_empty() {
        msg_print!(Message::MigrationHistory, true);
        View::migrations(&history)?;
    }
    Ok(())
}
