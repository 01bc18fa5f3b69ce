//! Import template generation

use crate::constants::{TEMPLATE_HEADERS, TEMPLATE_SAMPLE_ROWS};

/// CSV template with the standard header row and three sample rows
pub fn generate_template() -> String {
    let mut template = TEMPLATE_HEADERS.join(",");
    template.push('\n');
    for row in TEMPLATE_SAMPLE_ROWS {
        template.push_str(row);
        template.push('\n');
    }
    template
}
