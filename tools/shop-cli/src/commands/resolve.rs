//! Follow the redirect table and the request gate for one path.

use anyhow::{anyhow, Result};
use serde_json::json;
use shop_auth::Role;
use shop_router::{trace, RedirectTable, RequestGate, Resolution};

use super::ResolveArgs;
use crate::context::Context;
use crate::output::decision_badge;

pub async fn run(args: ResolveArgs, ctx: &Context) -> Result<()> {
    let routing = &ctx.config.routing;
    let table = RedirectTable::from_config(routing);
    let resolution = trace(&args.path, &table);

    let decision = match &args.role {
        Some(raw) => {
            let role: Role = raw
                .parse()
                .map_err(|_| anyhow!("unknown role {raw:?}; expected guest, user or admin"))?;
            let gate = RequestGate::from_config(routing)?;
            Some((role, gate.evaluate(&args.path, role)))
        }
        None => None,
    };

    if ctx.output.is_json() {
        let resolution = match &resolution {
            Resolution::NoRedirect => json!({ "kind": "none" }),
            Resolution::Redirect(target) => json!({ "kind": "redirect", "target": target }),
            Resolution::Cycle(chain) => json!({ "kind": "cycle", "chain": chain }),
        };
        let gate = decision.as_ref().map(|(role, d)| {
            json!({ "role": role, "decision": format!("{d:?}") })
        });
        ctx.output.json(&json!({ "path": args.path, "resolution": resolution, "gate": gate }));
        return Ok(());
    }

    match &resolution {
        Resolution::NoRedirect => ctx.output.info(&format!("{} is not redirected", args.path)),
        Resolution::Redirect(target) => ctx.output.success(&format!("{} -> {}", args.path, target)),
        Resolution::Cycle(chain) => ctx
            .output
            .warn(&format!("redirect cycle, not followed: {}", chain.join(" -> "))),
    }
    if let Some((role, d)) = decision {
        ctx.output.kv(&format!("gate ({role})"), &decision_badge(&d));
    }
    Ok(())
}
