//! CLI command for `iowarp-build list`

use anyhow::Result;

use crate::cli::output::{is_json, print_detail, print_info};
use crate::core::settings::Settings;

/// Execute the list command
pub fn execute(settings: &Settings) -> Result<()> {
    let registry = settings.registry();

    if is_json() {
        let json_result = serde_json::json!({ "components": registry.components() });
        println!("{}", serde_json::to_string_pretty(&json_result)?);
        return Ok(());
    }

    print_info(&format!("{} components, built in this order:", registry.len()));
    for (index, spec) in registry.components().iter().enumerate() {
        println!("  {}. {}", index + 1, spec.name());
        print_detail(&format!("repo: {}", spec.source_location()));
        if !spec.depends_on().is_empty() {
            print_detail(&format!("depends on: {}", spec.depends_on().join(", ")));
        }
        for option in spec.build_options() {
            print_detail(&format!("option: {option}"));
        }
    }

    Ok(())
}
