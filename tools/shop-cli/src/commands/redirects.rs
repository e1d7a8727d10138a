//! List the redirect table and lint it for cycles.

use anyhow::{bail, Result};
use serde_json::json;
use shop_router::{resolve, RedirectTable};

use super::RedirectsArgs;
use crate::context::Context;

pub async fn run(args: RedirectsArgs, ctx: &Context) -> Result<()> {
    let table = RedirectTable::from_config(&ctx.config.routing);
    let cycles = table.cycles();

    if ctx.output.is_json() {
        let entries: Vec<_> = table
            .iter()
            .map(|(from, to)| json!({ "from": from, "to": to, "resolves_to": resolve(from, &table) }))
            .collect();
        ctx.output.json(&json!({ "redirects": entries, "cycles": cycles }));
    } else {
        if !args.cycles_only {
            ctx.output.header(&format!("Redirects ({})", table.len()));
            let width = table.iter().map(|(from, _)| from.len()).max().unwrap_or(4).max(4);
            ctx.output.table_row(&["FROM", "TO", "FINAL"], &[width, width, 0]);
            for (from, to) in table.iter() {
                let last = resolve(from, &table).unwrap_or_else(|| "-".to_string());
                ctx.output.table_row(&[from, to, last.as_str()], &[width, width, 0]);
            }
        }
        for cycle in &cycles {
            ctx.output.warn(&format!("cycle: {}", cycle.join(" -> ")));
        }
    }

    if !cycles.is_empty() {
        bail!("redirect table has {} cycle(s)", cycles.len());
    }
    ctx.output.success("No redirect cycles");
    Ok(())
}
