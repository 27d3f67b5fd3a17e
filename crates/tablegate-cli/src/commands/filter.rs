//! `tablegate filter` - apply the listing filter to a set of table names.

use super::{print_json, Outcome, Settings};
use anyhow::Result;

pub fn visible_tables(settings: &Settings, names: &[String]) -> Result<Vec<String>> {
    Ok(settings.gate()?.filter_table_list(names))
}

pub fn run(settings: &Settings, names: &[String]) -> Result<Outcome> {
    let visible = visible_tables(settings, names)?;

    if settings.json {
        print_json(&visible)?;
    } else {
        for name in &visible {
            println!("{}", name);
        }
    }
    Ok(Outcome::Allowed)
}
