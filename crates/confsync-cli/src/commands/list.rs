//! List command implementation

use colored::Colorize;

use crate::context::RunContext;
use crate::error::Result;

/// Run the list command
///
/// Every known application, with `*` marking the ones the config selects.
pub fn run_list(ctx: &RunContext) -> Result<()> {
    println!("{} {} apps:", "Found".bold(), ctx.catalog.len());

    for app in ctx.catalog.all() {
        if ctx.config.wants(&app.id) {
            println!("     {} {}", "*".green(), app.id.green().bold());
        } else {
            println!("     - {}", app.id.bold());
        }
    }

    Ok(())
}
