use anyhow::Result;

use crate::output;

pub fn execute() -> Result<()> {
    output::print_rules(&a11y_core::rules::catalogue());
    Ok(())
}
