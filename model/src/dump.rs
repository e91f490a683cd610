//! Serializable snapshot of a schema, for debugging and tooling.

use crate::aggregate::AggregateNode;
use crate::member::{Member, MemberKind};
use crate::node::ModelKind;
use crate::schema::Schema;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDump {
    pub application_name: String,
    pub aggregates: Vec<AggregateDump>,
    pub enums: Vec<EnumDump>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateDump {
    pub path: String,
    pub name: String,
    pub root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelKind>,
    pub members: Vec<MemberDump>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberDump {
    pub name: String,
    pub kind: MemberKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_type: Option<String>,
    /// Aggregate the member points at or was inherited from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
    pub is_key: bool,
    pub is_display_name: bool,
    pub is_required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDump {
    pub name: String,
    pub items: Vec<(String, i64)>,
}

impl MemberDump {
    fn from_member(member: &Member<'_>) -> Self {
        let mut dump = Self {
            name: member.name(),
            kind: member.kind(),
            member_type: None,
            related: None,
            is_key: false,
            is_display_name: false,
            is_required: false,
        };
        if let Some(value) = member.as_value() {
            dump.member_type = Some(value.member_type().name().to_string());
            dump.related = value
                .inherits()
                .map(|_| value.declaring_aggregate().path().to_string());
            dump.is_key = value.is_key();
            dump.is_display_name = value.is_display_name();
            dump.is_required = value.is_required();
        } else if let Some(relation) = member.as_relation() {
            dump.related = Some(relation.target().path().to_string());
            dump.is_key = relation.is_primary() || matches!(member, Member::Parent(_));
            dump.is_required = relation.is_required();
        } else if let Member::VariationItem(item) = member {
            dump.related = Some(item.target().path().to_string());
        }
        dump
    }
}

impl AggregateDump {
    fn from_aggregate(aggregate: &AggregateNode<'_>) -> Self {
        Self {
            path: aggregate.path().to_string(),
            name: aggregate.name().to_string(),
            root: aggregate.root().path().to_string(),
            model: aggregate.item().model,
            members: aggregate.members().iter().map(MemberDump::from_member).collect(),
        }
    }
}

impl Schema {
    /// One entry per aggregate, with its derived members.
    pub fn dump(&self) -> SchemaDump {
        SchemaDump {
            application_name: self.application_name().to_string(),
            aggregates: self
                .all_aggregates()
                .iter()
                .map(AggregateDump::from_aggregate)
                .collect(),
            enums: self
                .enums()
                .iter()
                .map(|e| EnumDump {
                    name: e.name.clone(),
                    items: e.items.iter().map(|i| (i.name.clone(), i.value)).collect(),
                })
                .collect(),
        }
    }
}

impl SchemaDump {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Tab separated rows: aggregate path, member name, kind, type, key flag.
    pub fn to_tsv(&self) -> String {
        let mut out = String::from("aggregate\tmember\tkind\ttype\tkey\n");
        for aggregate in &self.aggregates {
            for member in &aggregate.members {
                out.push_str(&format!(
                    "{}\t{}\t{}\t{}\t{}\n",
                    aggregate.path,
                    member.name,
                    member.kind.as_str(),
                    member.member_type.as_deref().unwrap_or(""),
                    if member.is_key { "key" } else { "" }
                ));
            }
        }
        out
    }
}
