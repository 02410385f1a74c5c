//! Tables.

use super::{BlockContext, NodeFault};
use crate::document::{Node, TABLE_CELL_KIND, TABLE_ROW_KIND};
use crate::eval::{count, field, Target};
use crate::model::BlockConstraints;
use crate::types::ValidationMessage;

pub(super) fn table(ctx: &BlockContext<'_>) -> Result<Vec<ValidationMessage>, NodeFault> {
    let BlockConstraints::Table(rules) = ctx.rule.constraints() else {
        return Err(ctx.mismatch());
    };
    let mut messages = Vec::new();
    let rows: Vec<&Node> = ctx.node.children_of_kind(TABLE_ROW_KIND).collect();
    let (header, body): (Vec<&Node>, Vec<&Node>) =
        rows.iter().copied().partition(|row| is_header(row));

    if let Some(columns) = &rules.columns {
        let widest = rows
            .iter()
            .map(|row| row.children_of_kind(TABLE_CELL_KIND).count())
            .max()
            .unwrap_or(0);
        messages.extend(count::check(
            columns,
            widest,
            "table.columns",
            "Table columns",
            &ctx.node_location(),
        ));
    }
    if let Some(row_rule) = &rules.rows {
        messages.extend(count::check(
            row_rule,
            body.len(),
            "table.rows",
            "Table rows",
            &ctx.node_location(),
        ));
    }
    if let Some(header_rule) = &rules.header {
        if header.is_empty() {
            if header_rule.required {
                let target = Target::new("table.header", "Table header", None, ctx.node_location());
                messages.push(field::missing(&target, header_rule.severity));
            }
        } else {
            for cell in header
                .iter()
                .copied()
                .flat_map(|row| row.children_of_kind(TABLE_CELL_KIND))
            {
                let text = cell.content.as_deref().or(cell.title.as_deref());
                let location = match text {
                    Some(t) => ctx.child_location(cell, t.trim()),
                    None => ctx.locator.whole_line(cell.line),
                };
                let target = Target::new("table.header", "Table header cell", text, location);
                messages.extend(field::check_text(header_rule, &target, &ctx.locator));
            }
        }
    }
    if let Some(caption) = &rules.caption {
        messages.extend(field::check_text(
            caption,
            &ctx.title_target("caption"),
            &ctx.locator,
        ));
    }
    Ok(messages)
}

fn is_header(row: &Node) -> bool {
    row.attribute("role") == Some("header")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::evaluate;
    use crate::model::{BlockRule, CountRule, Pattern, TableRules, TextRule};
    use crate::source::{Locator, SourceText};
    use crate::types::{FindingKind, Severity};
    use std::path::Path;

    const SOURCE: &str = "|===\n|name |value\n\n|a |1\n|b |2\n|===";

    fn row(line: usize, cells: &[&str]) -> Node {
        cells.iter().fold(Node::new(TABLE_ROW_KIND, line), |row, text| {
            row.with_child(Node::new(TABLE_CELL_KIND, line).with_content(*text))
        })
    }

    fn run(node: &Node, rules: TableRules) -> Vec<ValidationMessage> {
        let src = SourceText::new(SOURCE);
        let rule = BlockRule::new(BlockConstraints::Table(rules), Severity::Error);
        let ctx = BlockContext::new(node, &rule, Locator::new(Path::new("t.adoc"), &src));
        evaluate(&ctx).unwrap()
    }

    fn with_header() -> Node {
        Node::new("table", 1)
            .with_child(row(2, &["name", "value"]).with_attribute("role", "header"))
            .with_child(row(4, &["a", "1"]))
            .with_child(row(5, &["b", "2"]))
            .ending_at(6)
    }

    #[test]
    fn rows_exclude_header() {
        let msgs = run(
            &with_header(),
            TableRules {
                rows: Some(CountRule::new(Some(3), None, Severity::Warn)),
                columns: Some(CountRule::new(None, Some(2), Severity::Warn)),
                ..TableRules::default()
            },
        );
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].rule_id, "table.rows.min");
        assert_eq!(msgs[0].actual.as_deref(), Some("2"));
    }

    #[test]
    fn header_cells_checked_individually() {
        let msgs = run(
            &with_header(),
            TableRules {
                header: Some(
                    TextRule::new(Severity::Warn).pattern(Pattern::new("^[A-Z]").unwrap()),
                ),
                ..TableRules::default()
            },
        );
        let spans: Vec<String> = msgs.iter().map(|m| m.location.to_string()).collect();
        assert_eq!(spans, vec!["t.adoc:2:2-5", "t.adoc:2:8-12"]);
        assert!(msgs.iter().all(|m| m.rule_id == "table.header.pattern"));
    }

    #[test]
    fn missing_header_row() {
        let node = Node::new("table", 1)
            .with_child(row(4, &["a", "1"]))
            .ending_at(6);
        let msgs = run(
            &node,
            TableRules {
                header: Some(TextRule::new(Severity::Error).required()),
                ..TableRules::default()
            },
        );
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].rule_id, "table.header.required");
        assert_eq!(msgs[0].kind, Some(FindingKind::MissingValue));
        assert_eq!(msgs[0].location.to_string(), "t.adoc:1:1-4");
    }
}
