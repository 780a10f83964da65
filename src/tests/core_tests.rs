//! Catalog and tree tests
//!
//! These tests cover how the catalog describes the blocks and how a
//! workspace saved by the editing surface is read back.

#[cfg(test)]
mod core_tests {
    use serde_json::json;

    use crate::categories::toolbox::Toolbox;
    use crate::categories::BlockCategory;
    use crate::core::node::{field_names, slot_names};
    use crate::core::{BlockCatalog, FieldValue, Node, NodeKind, Shape, Workspace};

    /// Every block kind has exactly one definition, grouped under the
    /// category the toolbox shows it in.
    #[test]
    fn test_catalog_categories() {
        let catalog = BlockCatalog::standard();
        assert_eq!(catalog.len(), NodeKind::ALL.len());

        let kinds_in = |category| -> Vec<NodeKind> {
            catalog.by_category(category).iter().map(|d| d.kind).collect()
        };
        assert_eq!(kinds_in(BlockCategory::Triggers), vec![NodeKind::TriggerStart]);
        assert_eq!(kinds_in(BlockCategory::Logic), vec![NodeKind::Condition]);
        assert_eq!(kinds_in(BlockCategory::Timing), vec![NodeKind::Delay]);
        assert_eq!(kinds_in(BlockCategory::Output), vec![NodeKind::Output]);
    }

    /// The trigger can only start a chain; value blocks can only fill value
    /// slots; everything else is a statement.
    #[test]
    fn test_block_shapes() {
        assert_eq!(NodeKind::TriggerStart.shape(), Shape::Trigger);
        assert!(!NodeKind::ValueText.has_next());
        assert!(NodeKind::Delay.has_next());
        assert_eq!(
            NodeKind::Condition.slots().iter().map(|(n, _)| *n).collect::<Vec<_>>(),
            vec![slot_names::COMPARE_VALUE, slot_names::DO, slot_names::ELSE]
        );
    }

    /// The editor exports the tree as nested JSON; fields hold numbers or
    /// dropdown codes, and empty slots may hold shadow blocks.
    #[test]
    fn test_workspace_from_editor_json() {
        let ws = Workspace::from_json(
            &json!({
                "blocks": {
                    "languageVersion": 0,
                    "blocks": [{
                        "type": "trigger_start",
                        "id": "t",
                        "x": 20, "y": 20,
                        "next": {"block": {
                            "type": "condition",
                            "id": "c",
                            "fields": {"VAR": "score", "OPERATOR": "GTE"},
                            "inputs": {
                                "COMPARE_VALUE": {"shadow": {
                                    "type": "value_number", "id": "s", "fields": {"NUM": 10}
                                }}
                            }
                        }}
                    }]
                }
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(ws.node_count(), 3);
        let condition = ws.find(&"c".into()).unwrap();
        assert_eq!(condition.field(field_names::OPERATOR), Some(&FieldValue::from("GTE")));
        let compare = condition.input(slot_names::COMPARE_VALUE).unwrap();
        assert_eq!(compare.number_field(field_names::NUM), Some(10.0));
    }

    /// Saving and loading must not lose positions, fields or links.
    #[test]
    fn test_workspace_json_round_trip() {
        let ws = Workspace::new().with_block(
            Node::trigger().with_id("t").at(10.0, 40.0).then(vec![
                Node::set_variable("greeting", Node::text("hi")),
                Node::condition("n", "NEQ", Node::number(2.0))
                    .when_true(vec![Node::transform("n", "ADD_1")])
                    .otherwise(vec![Node::delay(0.5)]),
                Node::output(Node::variable("greeting")),
            ]),
        );
        let back = Workspace::from_json(&ws.to_json().unwrap()).unwrap();
        assert_eq!(back, ws);
        assert_eq!(back.top_blocks().len(), 1);
    }

    #[test]
    fn test_unknown_block_type_is_rejected() {
        let result = Workspace::from_json(
            r#"{"blocks": {"blocks": [{"type": "loop_forever", "id": "l"}]}}"#,
        );
        assert!(result.is_err());
    }

    /// A hand-edited save may carry out-of-range values; conforming brings
    /// them back within what the editor allows.
    #[test]
    fn test_conform_after_load() {
        let catalog = BlockCatalog::standard();
        let mut ws = Workspace::new().with_block(Node::trigger().then(vec![
            Node::delay(-3.0).with_id("d"),
            Node::condition("x", "???", Node::number(1.0)).with_id("c"),
        ]));
        catalog.conform(&mut ws);
        assert_eq!(
            ws.find(&"d".into()).unwrap().field(field_names::SECONDS),
            Some(&FieldValue::Number(0.0))
        );
        assert_eq!(
            ws.find(&"c".into()).unwrap().field(field_names::OPERATOR),
            Some(&FieldValue::from("GT"))
        );
    }

    /// The toolbox JSON lists one category per catalog category, each with
    /// its blocks.
    #[test]
    fn test_toolbox_json_matches_catalog() {
        let toolbox = Toolbox::standard().to_editor_json();
        let categories = toolbox["contents"].as_array().unwrap();
        assert_eq!(categories.len(), BlockCategory::ALL.len());

        let catalog = BlockCatalog::standard();
        for kind in Toolbox::standard().kinds() {
            assert!(catalog.contains(kind), "toolbox offers unknown block {kind}");
        }
    }
}
