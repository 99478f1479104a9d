//! Table, tree and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use drivehub_entity::hierarchy::HierarchyItem;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => print_json(items),
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{:#?}", item),
        OutputFormat::Json => print_json(item),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("Failed to encode JSON: {}", e)),
    }
}

/// Print a hierarchy as an indented tree.
pub fn print_tree(root: &HierarchyItem) {
    print!("{}", render_tree(root));
}

fn render_tree(root: &HierarchyItem) -> String {
    let mut out = String::new();
    render_node(root, "", true, true, &mut out);
    out
}

fn render_node(item: &HierarchyItem, prefix: &str, last: bool, is_root: bool, out: &mut String) {
    let (branch, child_prefix) = match (is_root, last) {
        (true, _) => ("", String::new()),
        (false, true) => ("└── ", format!("{prefix}    ")),
        (false, false) => ("├── ", format!("{prefix}│   ")),
    };

    let mut line = format!("{prefix}{branch}{} [{}]", item.display_name(), item.role());
    if item.is_folder() {
        line.push('/');
    }
    if !item.is_active() {
        line.push_str(" (inactive)");
    }
    if let HierarchyItem::Folder(folder) = item {
        if folder.listing_failed {
            line.push_str(" (listing failed)");
        }
    }
    out.push_str(&line);
    out.push('\n');

    let children = item.children();
    for (i, child) in children.iter().enumerate() {
        render_node(child, &child_prefix, i + 1 == children.len(), false, out);
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivehub_entity::hierarchy::{FileItem, FolderItem, Role};

    fn file(id: &str, name: &str, active: bool) -> HierarchyItem {
        HierarchyItem::File(FileItem {
            id: id.to_string(),
            original_name: name.to_string(),
            display_name: name.to_string(),
            role: Role::File,
            order: 0,
            prefixes: Vec::new(),
            suffixes: Vec::new(),
            depth: 1,
            is_active: active,
            mime_type: "application/pdf".to_string(),
            description: None,
            properties: None,
            content_code: None,
            preview_url: None,
            download_url: None,
            view_url: None,
            thumbnail_url: None,
        })
    }

    #[test]
    fn test_render_tree() {
        let root = HierarchyItem::Folder(FolderItem {
            id: "root".to_string(),
            original_name: "Root".to_string(),
            display_name: "Root".to_string(),
            role: Role::Generic,
            order: 0,
            prefixes: Vec::new(),
            suffixes: Vec::new(),
            depth: 0,
            is_active: true,
            listing_failed: false,
            children: vec![file("a", "a.pdf", true), file("b", "b.pdf", false)],
        });

        assert_eq!(
            render_tree(&root),
            "Root [generic]/\n├── a.pdf [file]\n└── b.pdf [file] (inactive)\n"
        );
    }
}
