use crate::core::editor::PreferenceEditor;
use crate::domain::model::Target;
use crate::domain::ports::SettingsStore;
use crate::utils::error::Result;
use crate::utils::format::percent_text;
use std::io::Write;

/// Capability flags shown as columns in the table.
fn capability_columns<S: SettingsStore>(editor: &PreferenceEditor<S>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for info in editor.categories().entries() {
        for capability in &info.capabilities {
            if !columns.contains(capability) {
                columns.push(capability.clone());
            }
        }
    }
    columns
}

/// Plain-text grid: one row per category, one percent column per target.
/// Categories no target uses are marked with `~`.
pub fn render_table<S: SettingsStore>(editor: &PreferenceEditor<S>) -> String {
    let capabilities = capability_columns(editor);

    let mut header = vec![String::new()];
    header.extend(capabilities.iter().cloned());
    header.extend(editor.targets().iter().map(|t| t.label.clone()));

    let mut rows = vec![header];
    for info in editor.categories().entries() {
        let marker = if editor.is_category_in_use(&info.key) { "" } else { "~" };
        let mut row = vec![format!("{}{}", marker, info.name)];
        row.extend(
            capabilities
                .iter()
                .map(|c| if info.has(c) { "x".to_string() } else { String::new() }),
        );
        for spec in editor.targets() {
            let ratio = editor
                .distribution(&spec.key)
                .map(|d| d.get(&info.key))
                .unwrap_or(0.0);
            row.push(percent_text(ratio));
        }
        rows.push(row);
    }

    let column_count = rows[0].len();
    let widths: Vec<usize> = (0..column_count)
        .map(|i| rows.iter().map(|r| r[i].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                if i == 0 {
                    format!("{:<width$}", cell, width = width)
                } else {
                    format!("{:>width$}", cell, width = width)
                }
            })
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

/// Write raw ratios as delimited text: `target,<category...>` with one row per target.
pub fn write_delimited<S: SettingsStore, W: Write>(
    editor: &PreferenceEditor<S>,
    delimiter: u8,
    writer: W,
) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    let mut header = vec!["target".to_string()];
    header.extend(editor.categories().keys().iter().map(|c| c.to_string()));
    csv_writer.write_record(&header)?;

    for spec in editor.targets() {
        let distribution = editor.distribution(&spec.key)?;
        let mut record = vec![spec.key.to_string()];
        record.extend(
            editor
                .categories()
                .keys()
                .iter()
                .map(|c| format!("{:.6}", distribution.get(c))),
        );
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// One line per preset: name followed by its non-zero percentages.
pub fn render_presets<S: SettingsStore>(editor: &PreferenceEditor<S>) -> String {
    let mut out = String::new();
    for preset in editor.presets() {
        let parts: Vec<String> = preset
            .distribution
            .iter()
            .filter(|(_, r)| *r > 0.0)
            .map(|(c, r)| format!("{} {}", c, percent_text(r)))
            .collect();
        out.push_str(&format!("({}) {}\n", preset.name, parts.join(", ")));
    }
    out
}

pub fn target_label<S: SettingsStore>(editor: &PreferenceEditor<S>, target: &Target) -> String {
    editor
        .targets()
        .iter()
        .find(|t| &t.key == target)
        .map(|t| t.label.clone())
        .unwrap_or_else(|| target.to_string())
}
