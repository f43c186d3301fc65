//! Settings command - list writable parameters

use econet_client::PARAMETERS;

use crate::output::{OutputContext, SettingRow};

/// List the parameters the client knows how to write
pub fn settings(ctx: &OutputContext) {
    let rows: Vec<SettingRow> = PARAMETERS
        .iter()
        .map(|def| SettingRow {
            name: def.name.to_string(),
            key: def.key,
            description: def.description.to_string(),
        })
        .collect();

    ctx.print(&rows);
}
