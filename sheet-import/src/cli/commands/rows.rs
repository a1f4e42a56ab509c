//! `rows` command: stored rows grouped by date

use anyhow::Result;
use colored::*;

use crate::cli::RowsArgs;
use crate::cli::context::AppContext;
use crate::listing::group_by_date;

pub async fn handle_rows_command(ctx: &AppContext, args: RowsArgs) -> Result<()> {
    if let Some(id) = &args.id {
        if ctx.rows.exists(id).await? {
            println!("{} {}", "Stored:".green(), id);
        } else {
            println!("{} {}", "Not stored:".yellow(), id);
        }
        return Ok(());
    }

    let rows = ctx.rows.list().await?;
    let groups = group_by_date(&rows);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    if groups.is_empty() {
        println!("{}", "No rows stored".dimmed());
        return Ok(());
    }

    for (date, group) in &groups {
        let label = if date.is_empty() { "(no date)" } else { date.as_str() };
        println!("{}", label.bold());
        for (id, name) in group.ids.iter().zip(&group.names) {
            println!("  {:>8}  {}", id.cyan(), name);
        }
    }
    Ok(())
}
