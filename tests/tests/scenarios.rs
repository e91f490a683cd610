//! End-to-end scenarios over the schema fixtures.

use aggraph_tests::prelude::*;

mod orders {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("orders")
            .fixture("orders.schema")
            .check("order_members", |e| {
                e.aggregate("Order")
                    .members(&["Id", "Placed", "Lines", "Shipping"])
                    .keys(&["Id"])
                    .display(&["Id"])
            })
            .check("line_inherits_order_key", |e| {
                e.aggregate("Order/Lines")
                    .members(&["Order", "Order_Id", "LineNo", "Amount", "Details"])
                    .keys(&["Order_Id", "LineNo"])
                    .columns(&["Order_Id", "LineNo", "Amount"])
            })
            .check("detail_inherits_two_hops", |e| {
                e.aggregate("Order/Lines/Details")
                    .keys(&["OrderLine_Order_Id", "OrderLine_LineNo"])
                    .foreign_key("OrderLine", &["OrderLine_Order_Id", "OrderLine_LineNo"])
            })
            .check("order_navigates_down", |e| {
                e.aggregate("Order")
                    .navigates("Lines", Multiplicity::Many)
                    .navigates("Shipping", Multiplicity::One)
            })
            .check("line_navigates_up", |e| {
                e.aggregate("Order/Lines")
                    .navigates("Parent", Multiplicity::One)
                    .navigates("Details", Multiplicity::Many)
                    .foreign_key("Order", &["Order_Id"])
            })
            .check("single_child_keys", |e| {
                e.aggregate("Order/Shipping").keys(&["Order_Id"])
            })
            .check("one_root", |e| e.data_flow(&["Order"]))
    }

    #[test]
    fn test_order_lines_inherit_and_navigate() {
        scenario().run().unwrap();
    }
}

mod invoices {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("invoices")
            .fixture("invoices.schema")
            .check("keys_come_from_customer", |e| {
                e.aggregate("Invoice")
                    .members(&["Customer", "Customer_Id", "Total"])
                    .keys(&["Customer_Id"])
                    .display(&["Customer_Name"])
            })
            .check("customer_flows_first", |e| {
                e.data_flow(&["Customer", "Invoice", "Payment"])
            })
            .check("shared_identity_is_one", |e| {
                e.aggregate("Customer")
                    .navigates("Invoice_Customer", Multiplicity::One)
            })
            .check("plain_reference_is_many", |e| {
                e.aggregate("Invoice")
                    .navigates("Customer", Multiplicity::One)
                    .navigates("Payment_Invoice", Multiplicity::Many)
            })
            .check("payment_foreign_key", |e| {
                e.aggregate("Payment")
                    .keys(&["No"])
                    .columns(&["No", "Invoice_Customer_Id"])
                    .foreign_key("Invoice", &["Invoice_Customer_Id"])
            })
    }

    #[test]
    fn test_primary_reference_supplies_identity() {
        scenario().run().unwrap();
    }
}

mod references {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("references")
            .fixture("references.schema")
            .check("self_reference_mirrors_own_key", |e| {
                e.aggregate("Employee")
                    .members(&["Id", "Manager", "Manager_Id"])
                    .keys(&["Id"])
                    .columns(&["Id", "Manager_Id"])
                    .foreign_key("Employee", &["Manager_Id"])
            })
            .check("reference_into_own_tree", |e| {
                e.aggregate("Order")
                    .keys(&["Id"])
                    .columns(&["Id", "Favorite_Order_Id", "Favorite_LineNo"])
                    .foreign_key("OrderLine", &["Favorite_Order_Id", "Favorite_LineNo"])
            })
            .check("line_key_unchanged", |e| {
                e.aggregate("Order/Lines").keys(&["Order_Id", "LineNo"])
            })
            .check("reference_into_other_tree_child", |e| {
                e.aggregate("Refund")
                    .keys(&["No"])
                    .columns(&["No", "Line_Order_Id", "Line_LineNo"])
                    .foreign_key("OrderLine", &["Line_Order_Id", "Line_LineNo"])
            })
            .check("referred_line_navigates_back", |e| {
                e.aggregate("Order/Lines")
                    .navigates("Refund_Line", Multiplicity::Many)
                    .navigates("Order_Favorite", Multiplicity::Many)
            })
            .check("own_tree_is_no_dependency", |e| {
                e.data_flow(&["Employee", "Order", "Refund"])
            })
    }

    #[test]
    fn test_references_mirror_full_target_keys() {
        scenario().run().unwrap();
    }
}

mod cycle {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("cycle")
            .fixture("cycle.schema")
            .check("no_data_flow_order", |e| e.data_flow_cycle())
    }

    #[test]
    fn test_mutual_primary_references_report_cycle() {
        scenario().run().unwrap();
    }

    #[test]
    fn test_cycle_message_names_both_roots() {
        let schema = scenario().compile().unwrap().unwrap();

        let err = schema
            .data_flow_order(&schema.root_aggregates())
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Reference cycle prevents data-flow ordering of: Husband, Wife"
        );
    }
}

mod key_and_name {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("key_and_name")
            .source(
                r#"
                App {
                    Customer {
                        Code is="key name"
                    }
                }
                "#,
            )
            .check("both_facts_resolve", |e| {
                e.aggregate("Customer")
                    .keys(&["Code"])
                    .display(&["Code"])
                    .assert_fn(|schema| {
                        let customer = schema.find_aggregate("Customer").unwrap();
                        let code = &customer.key_values()[0];
                        code.is_required() && code.member_type().name() == "word"
                    })
            })
    }

    #[test]
    fn test_key_name_flags_do_not_conflict() {
        scenario().run().unwrap();
    }
}

mod payments {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("payments")
            .fixture("payments.schema")
            .check("group_members", |e| {
                e.aggregate("Payment")
                    .members(&["Id", "Method", "Cash", "Card", "Note"])
                    .columns(&["Id", "Method", "Note"])
                    .navigates("Cash", Multiplicity::One)
                    .navigates("Card", Multiplicity::One)
            })
            .check("item_members", |e| {
                e.aggregate("Payment/Card")
                    .members(&["Payment", "Payment_Id", "Number"])
                    .navigates("Parent", Multiplicity::One)
            })
            .check("switch_enum", |e| {
                e.assert_fn(|schema| {
                    schema
                        .member_types()
                        .get_enum("E_Method")
                        .is_some_and(|method| method.values() == vec![1, 2])
                })
            })
    }

    #[test]
    fn test_variation_group_and_discriminator() {
        scenario().run().unwrap();
    }
}

mod catalog {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("catalog")
            .fixture("catalog.schema")
            .check("config_section", |e| {
                e.assert_fn(|schema| {
                    schema.config().root_namespace.as_deref() == Some("Acme.Catalog")
                        && schema.config().get("Owner") == Some("sales")
                })
            })
            .check("declared_enum", |e| {
                e.assert_fn(|schema| {
                    schema
                        .member_types()
                        .get_enum("Color")
                        .is_some_and(|color| color.values() == vec![1, 0, 2])
                })
            })
            .check("product", |e| {
                e.aggregate("Product")
                    .members(&["Code", "Shade"])
                    .display(&["Code"])
            })
            .check("depends_on_orders_roots", |e| {
                e.data_flow(&["Product", "StockReport"])
            })
            .check("read_model_is_not_stored", |e| {
                e.assert_fn(|schema| {
                    let report = schema.find_aggregate("StockReport").unwrap();
                    !report.is_stored() && schema.find_aggregate("Product").unwrap().is_stored()
                })
            })
    }

    #[test]
    fn test_config_enums_and_dependencies() {
        scenario().run().unwrap();
    }
}

mod broken {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("broken")
            .fixture("broken.schema")
            .check("all_problems_reported", |e| e.diagnostics(4))
            .check("conflict", |e| e.error("Conflicting values for member type on 'Code'"))
            .check("unknown_type", |e| e.error_matches(r"Unknown member type 'stars'"))
            .check("unknown_target", |e| {
                e.error_matches(r"Reference 'Boss' points at unknown aggregate 'Nobody'")
            })
    }

    #[test]
    fn test_recoverable_problems_accumulate() {
        scenario().run().unwrap();
    }
}

mod config {
    use super::*;

    pub fn scenario() -> Scenario {
        Scenario::new("config")
            .source(
                r#"
                App {
                    Account Color="blue" {
                        Balance is="money"
                    }
                }
                "#,
            )
            .config(
                CompilerConfig::from_toml_str(
                    r#"
                    report_unknown_attributes = true

                    [[custom_types]]
                    name = "money"
                    primitive = "decimal"
                    search = "range"
                    "#,
                )
                .unwrap(),
            )
            .check("unknown_attribute", |e| {
                e.diagnostics(1).error("Unknown attribute 'Color' on 'Account'")
            })
    }

    #[test]
    fn test_compiler_config_from_toml() {
        scenario().run().unwrap();
    }
}

mod dumps {
    use super::*;

    #[test]
    fn test_dumps_of_orders() {
        let schema = Scenario::new("dumps")
            .fixture("orders.schema")
            .compile()
            .unwrap()
            .unwrap();

        let tsv = schema.dump().to_tsv();
        assert!(tsv.contains("Order/Lines\tOrder_Id\tscalar\tword\tkey\n"));

        let json = schema.dump().to_json().unwrap();
        assert!(json.contains("\"application_name\": \"Shop\""));

        let mermaid = schema.to_mermaid();
        assert!(mermaid.contains("==>|\"Lines\"|"));
    }
}
