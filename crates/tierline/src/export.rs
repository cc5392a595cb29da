//! JSON documents handed to external tools: a table/relationship schema description and a
//! node/edge workflow.

use crate::error::{Error, Result};
use crate::layout::LayoutResult;
use crate::model::{Edge, Node};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub tables: Vec<Table>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub primary_key: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// `table.column` this column points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Cardinality {
    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::OneToOne => "one-to-one",
            Cardinality::OneToMany => "one-to-many",
            Cardinality::ManyToOne => "many-to-one",
            Cardinality::ManyToMany => "many-to-many",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// `table.column` of the referencing side.
    pub from: String,
    /// `table.column` of the referenced side.
    pub to: String,
    #[serde(rename = "type")]
    pub cardinality: Cardinality,
}

fn split_column_ref(reference: &str) -> Option<(&str, &str)> {
    let (table, column) = reference.split_once('.')?;
    (!table.is_empty() && !column.is_empty()).then_some((table, column))
}

impl SchemaDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Table names must be unique, and every relationship end and foreign key must name an
    /// existing `table.column`.
    pub fn validate(&self) -> Result<()> {
        let mut columns: FxHashMap<&str, FxHashSet<&str>> = FxHashMap::default();
        for table in &self.tables {
            let names: FxHashSet<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
            if columns.insert(table.name.as_str(), names).is_some() {
                return Err(Error::InvalidSchema {
                    message: format!("duplicate table {}", table.name),
                });
            }
        }

        let check = |reference: &str, context: &str| -> Result<()> {
            let Some((table, column)) = split_column_ref(reference) else {
                return Err(Error::InvalidSchema {
                    message: format!("{context}: `{reference}` is not a table.column reference"),
                });
            };
            match columns.get(table) {
                Some(cols) if cols.contains(column) => Ok(()),
                Some(_) => Err(Error::InvalidSchema {
                    message: format!("{context}: table {table} has no column {column}"),
                }),
                None => Err(Error::InvalidSchema {
                    message: format!("{context}: unknown table {table}"),
                }),
            }
        };

        for table in &self.tables {
            for column in &table.columns {
                if let Some(fk) = &column.foreign_key {
                    check(fk, &format!("{}.{}", table.name, column.name))?;
                }
            }
        }
        for (i, rel) in self.relationships.iter().enumerate() {
            let context = format!("relationship #{i}");
            check(&rel.from, &context)?;
            check(&rel.to, &context)?;
        }
        Ok(())
    }

    /// One node per table and one edge per relationship, pointing from the referencing table to
    /// the referenced one. Node data carries the table label and its column names.
    pub fn to_graph(&self) -> Result<(Vec<Node>, Vec<Edge>)> {
        self.validate()?;

        let nodes: Vec<Node> = self
            .tables
            .iter()
            .map(|t| {
                let columns: Vec<Value> = t
                    .columns
                    .iter()
                    .map(|c| json!({ "name": c.name, "type": c.data_type, "primaryKey": c.primary_key }))
                    .collect();
                Node::new(t.name.clone())
                    .with_kind("table")
                    .with_data(json!({ "label": t.name, "columns": columns }))
            })
            .collect();

        let edges: Vec<Edge> = self
            .relationships
            .iter()
            .filter_map(|rel| {
                let (from_table, _) = split_column_ref(&rel.from)?;
                let (to_table, _) = split_column_ref(&rel.to)?;
                Some(
                    Edge::new(format!("{}->{}", rel.from, rel.to), from_table, to_table)
                        .with_kind("smoothstep")
                        .with_label(rel.cardinality.as_str()),
                )
            })
            .collect();

        Ok((nodes, edges))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Workflow {
    pub fn new(name: impl Into<String>, layout: LayoutResult) -> Self {
        Self {
            name: name.into(),
            nodes: layout.nodes,
            edges: layout.edges,
        }
    }
}

/// Two-space indented JSON.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let mut text = to_json_pretty(value)?;
    text.push('\n');
    std::fs::write(path.as_ref(), text)?;
    tracing::debug!(path = %path.as_ref().display(), "wrote JSON document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> SchemaDocument {
        SchemaDocument::from_json(
            r#"{
                "tables": [
                    { "name": "users", "columns": [
                        { "name": "id", "type": "integer", "primary_key": true },
                        { "name": "email", "type": "varchar(255)", "unique": true },
                        { "name": "is_active", "type": "boolean", "default": true }
                    ] },
                    { "name": "transactions", "columns": [
                        { "name": "id", "type": "integer", "primary_key": true },
                        { "name": "user_id", "type": "integer", "foreign_key": "users.id" }
                    ] }
                ],
                "relationships": [
                    { "from": "transactions.user_id", "to": "users.id", "type": "many-to-one" }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn parses_column_flags() {
        let doc = schema();
        let users = doc.table("users").unwrap();
        assert!(users.columns[0].primary_key);
        assert!(users.columns[1].unique);
        assert_eq!(users.columns[2].default, Some(Value::Bool(true)));
        assert_eq!(doc.relationships[0].cardinality, Cardinality::ManyToOne);
    }

    #[test]
    fn serializes_without_unset_flags() {
        let doc = schema();
        let value = serde_json::to_value(&doc.tables[1].columns[1]).unwrap();
        assert_eq!(
            value,
            json!({ "name": "user_id", "type": "integer", "foreign_key": "users.id" })
        );
    }

    #[test]
    fn to_graph_points_relationships_at_referenced_tables() {
        let (nodes, edges) = schema().to_graph().unwrap();
        assert_eq!(
            nodes.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
            vec!["users", "transactions"]
        );
        assert_eq!(nodes[0].label(), Some("users"));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].source, "transactions");
        assert_eq!(edges[0].target, "users");
        assert_eq!(edges[0].label.as_deref(), Some("many-to-one"));
    }

    #[test]
    fn validate_rejects_unknown_references() {
        let mut doc = schema();
        doc.relationships[0].to = "accounts.id".to_string();
        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("unknown table accounts"));

        let mut doc = schema();
        doc.tables[1].columns[1].foreign_key = Some("users.uuid".to_string());
        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("no column uuid"));

        let mut doc = schema();
        doc.relationships[0].from = "transactions".to_string();
        assert!(doc.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_tables() {
        let mut doc = schema();
        let dup = doc.tables[0].clone();
        doc.tables.push(dup);
        assert!(matches!(doc.validate(), Err(Error::InvalidSchema { .. })));
    }

    #[test]
    fn pretty_json_uses_two_space_indent() {
        let text = to_json_pretty(&json!({ "a": [1] })).unwrap();
        assert_eq!(text, "{\n  \"a\": [\n    1\n  ]\n}");
    }

    #[test]
    fn write_json_round_trips_a_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workflow.json");
        let workflow = Workflow::new(
            "pipeline",
            LayoutResult {
                nodes: vec![Node::new("input"), Node::new("output")],
                edges: vec![Edge::new("e1", "input", "output")],
            },
        );
        write_json(&path, &workflow).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: Workflow = serde_json::from_str(&text).unwrap();
        assert_eq!(back, workflow);
    }
}
