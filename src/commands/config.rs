// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{BasisSetting, KeyValueStore, UserStore};
use crate::utils::{arg_str, maybe_print_json, parse_amount, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle<S: KeyValueStore>(store: &UserStore<S>, m: &clap::ArgMatches) -> Result<()> {
    let mut settings = store.settings()?;
    match m.subcommand() {
        Some(("show", sub)) => {
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &settings)? {
                let basis = match settings.income_basis {
                    BasisSetting::Transactions => "transactions",
                    BasisSetting::Stated => "stated",
                };
                let income = settings
                    .stated_income
                    .map(|i| format!("{:.2}", i))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}",
                    pretty_table(
                        &["User", "Currency", "Stated Income", "Income Basis"],
                        vec![vec![
                            store.user().to_string(),
                            settings.currency.clone(),
                            income,
                            basis.to_string(),
                        ]],
                    )
                );
            }
            return Ok(());
        }
        Some(("set-currency", sub)) => {
            let ccy = arg_str(sub, "currency")?.trim().to_uppercase();
            if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(anyhow!("Currency '{}' must be a 3-letter code", ccy));
            }
            settings.currency = ccy;
            println!("Currency set to {}", settings.currency);
        }
        Some(("set-income", sub)) => {
            let amount = parse_amount(arg_str(sub, "amount")?)?;
            settings.stated_income = Some(amount);
            println!("Stated income set to {:.2}", amount);
        }
        Some(("set-basis", sub)) => {
            settings.income_basis = match arg_str(sub, "basis")?.trim().to_ascii_lowercase().as_str() {
                "transactions" => BasisSetting::Transactions,
                "stated" => BasisSetting::Stated,
                other => return Err(anyhow!("Unknown basis '{}', expected transactions|stated", other)),
            };
            if settings.income_basis == BasisSetting::Stated && settings.stated_income.is_none() {
                println!("Note: no stated income yet; transaction income is used until one is set");
            }
            println!("Income basis updated");
        }
        _ => return Ok(()),
    }
    store.save_settings(&settings)?;
    Ok(())
}
