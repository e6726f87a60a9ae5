// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use budgetify::store::{SqliteStore, UserStore};
use budgetify::{cli, commands, db, utils};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    utils::init_tracing(matches.get_flag("verbose"));

    let conn = db::open_or_init()?;
    let user = matches
        .get_one::<String>("user")
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| "default".to_string());
    tracing::debug!(%user, "active user");
    let store = UserStore::new(SqliteStore::new(&conn), user);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&store, sub)?,
        Some(("category", sub)) => commands::categories::handle(&store, sub)?,
        Some(("investment", sub)) => commands::investments::handle(&store, sub)?,
        Some(("sheet", sub)) => commands::sheets::handle(&store, sub)?,
        Some(("entry", sub)) => commands::entries::handle(&store, sub)?,
        Some(("split", sub)) => commands::splits::handle(&store, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, sub)?,
        Some(("config", sub)) => commands::config::handle(&store, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
