use dish_core::AuthData;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `dish schema`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = schemars::schema_for!(AuthData);
    output(&schema, flags.format)
}
