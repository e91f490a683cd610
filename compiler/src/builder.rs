//! Populate the schema graph from a resolved element tree.
//!
//! Elements are visited depth-first in declaration order. Every aggregate,
//! scalar member and relation takes the next value of one counter, which is
//! the declaration order member derivation sorts by. References are linked
//! after the whole tree is built so they may point forward.

use crate::element::{
    resolve_element, ElementFacts, ElementKind, AGGREGATE_ATTRIBUTE, DB_NAME_ATTRIBUTE,
    DISPLAY_NAME_ATTRIBUTE, KEY_ATTRIBUTE, KNOWN_ATTRIBUTES,
};
use crate::{CompileError, CompilerConfig, Diagnostics};
use aggraph_core::{EdgeAttrs, NodeId, TreePath};
use aggraph_model::{
    Aggregate, AggregateNode, MemberOptions, ModelKind, ScalarMember, Schema, SchemaConfig,
    SchemaGraph, SchemaNode,
};
use aggraph_parser::{Document, Element, Span};
use aggraph_registry::{EnumDefinition, EnumItemDecl, EnumOrigin, RegistryBuilder};
use indexmap::IndexMap;
use regex_lite::Regex;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

/// Name of the top-level element holding schema settings.
pub const CONFIG_SECTION: &str = "_Config";
const ROOT_NAMESPACE: &str = "RootNamespace";
const NAMESPACE_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$";

/// A relation whose target is looked up once every aggregate exists.
#[derive(Debug)]
struct PendingRelation {
    owner: NodeId,
    element: String,
    target: String,
    attrs: EdgeAttrs,
    span: Span,
}

/// Builds one schema from one document.
pub struct SchemaBuilder<'c> {
    config: &'c CompilerConfig,
    graph: SchemaGraph,
    types: RegistryBuilder,
    schema_config: SchemaConfig,
    diagnostics: Vec<CompileError>,
    /// Declaration counter.
    order: u32,
    /// Every aggregate and scalar node by declaration path.
    paths: IndexMap<TreePath, NodeId>,
    pending_refs: Vec<PendingRelation>,
    pending_dependencies: Vec<PendingRelation>,
}

impl<'c> SchemaBuilder<'c> {
    pub fn new(config: &'c CompilerConfig) -> Self {
        let mut types = RegistryBuilder::with_builtins();
        let mut diagnostics = Vec::new();
        for ty in &config.custom_types {
            if let Err(e) = types.register(Arc::new(ty.clone())) {
                diagnostics.push(e.into());
            }
        }
        Self {
            config,
            graph: SchemaGraph::new(),
            types,
            schema_config: SchemaConfig::default(),
            diagnostics,
            order: 0,
            paths: IndexMap::new(),
            pending_refs: Vec::new(),
            pending_dependencies: Vec::new(),
        }
    }

    /// Build the schema, or every problem found on the way.
    pub fn build(mut self, document: &Document) -> Result<Schema, Diagnostics> {
        let root = &document.root;
        let application_name = self
            .config
            .application_name
            .clone()
            .unwrap_or_else(|| root.name.clone());

        // Enums first so members anywhere can use them.
        let mut declarations = Vec::new();
        for element in &root.children {
            if element.name == CONFIG_SECTION {
                self.read_config(element);
                continue;
            }
            let facts = self.resolve(element, true);
            if facts.kind == ElementKind::Enum {
                self.declare_enum(element);
            } else {
                declarations.push((element, facts));
            }
        }

        for (element, facts) in declarations {
            if facts.kind == ElementKind::RootAggregate {
                self.add_aggregate(element, &facts, TreePath::top(&element.name), None);
            } else {
                self.diagnostics
                    .push(CompileError::misplaced(&element.name, "at the top level", element.span));
            }
        }

        self.link_references();
        self.link_dependencies();
        self.register_variation_enums();

        if !self.diagnostics.is_empty() {
            return Err(Diagnostics::new(self.diagnostics));
        }
        Schema::new(
            application_name,
            self.schema_config,
            self.graph,
            self.types.build(),
        )
        .map_err(|e| Diagnostics::from(CompileError::from(e)))
    }

    fn next_order(&mut self) -> u32 {
        self.order += 1;
        self.order
    }

    /// Resolve an element's flags, recording its problems.
    fn resolve(&mut self, element: &Element, top_level: bool) -> ElementFacts {
        let (facts, errors) = resolve_element(element, top_level);
        self.diagnostics.extend(errors);
        if self.config.report_unknown_attributes {
            for attribute in &element.attributes {
                if !KNOWN_ATTRIBUTES.contains(&attribute.name.as_str()) {
                    self.diagnostics.push(CompileError::unknown_attribute(
                        &element.name,
                        &attribute.name,
                        attribute.span,
                    ));
                }
            }
        }
        facts
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId, relation: &str, attrs: EdgeAttrs) {
        match self.graph.add_edge(from, to, relation, attrs) {
            Ok(edge) => tracing::debug!(%edge, %from, %to, relation, "edge"),
            Err(e) => self.diagnostics.push(e.into()),
        }
    }

    // ==================== Aggregates ====================

    fn add_aggregate(
        &mut self,
        element: &Element,
        facts: &ElementFacts,
        path: TreePath,
        parent: Option<(NodeId, EdgeAttrs)>,
    ) {
        if self.paths.contains_key(&path) {
            self.diagnostics
                .push(CompileError::duplicate_path(&path, element.span));
            return;
        }

        let members: Vec<(&Element, ElementFacts)> = element
            .children
            .iter()
            .map(|child| (child, self.resolve(child, false)))
            .collect();
        let has_display_name = members
            .iter()
            .any(|(_, f)| f.kind == ElementKind::Scalar && f.is_display_name);

        let name = element.attr(AGGREGATE_ATTRIBUTE).unwrap_or(&element.name);
        let mut aggregate = Aggregate::new(path.clone(), name);
        aggregate.display_name = element.attr(DISPLAY_NAME_ATTRIBUTE).map(str::to_string);
        aggregate.db_name = element.attr(DB_NAME_ATTRIBUTE).map(str::to_string);
        if parent.is_none() {
            aggregate.model = Some(facts.model.unwrap_or(ModelKind::WriteModel));
        }
        aggregate.has_lifecycle = facts.has_lifecycle;
        aggregate.read_only = facts.read_only;
        aggregate.step = facts.step;
        aggregate.use_key_instead_of_name = !has_display_name;

        let id = self.graph.add_node(SchemaNode::Aggregate(aggregate));
        tracing::debug!(path = %path, node = %id, "aggregate");
        self.paths.insert(path.clone(), id);

        if let Some((parent, attrs)) = parent {
            let order = self.next_order();
            self.add_edge(parent, id, &element.name, attrs.order(order));
        }
        if let Some(target) = &facts.depends_on {
            let order = self.next_order();
            self.pending_dependencies.push(PendingRelation {
                owner: id,
                element: element.name.clone(),
                target: target.clone(),
                attrs: EdgeAttrs::depends_on().order(order),
                span: element.span,
            });
        }

        for (child, child_facts) in members {
            self.add_member(id, &path, child, child_facts);
        }
    }

    fn add_member(&mut self, owner: NodeId, owner_path: &TreePath, element: &Element, facts: ElementFacts) {
        match facts.kind {
            ElementKind::Scalar => self.add_scalar(owner, owner_path, element, &facts),
            ElementKind::Ref => self.queue_reference(owner, element, &facts),
            ElementKind::ChildAggregate => {
                let mut attrs = EdgeAttrs::child()
                    .required(facts.is_required)
                    .invisible(facts.invisible);
                if facts.is_array {
                    attrs = attrs.multiple();
                }
                let path = owner_path.child(&element.name);
                self.add_aggregate(element, &facts, path, Some((owner, attrs)));
            }
            ElementKind::VariationContainer => {
                self.add_variation_group(owner, owner_path, element, &facts)
            }
            ElementKind::VariationItem => self.diagnostics.push(CompileError::misplaced(
                &element.name,
                "outside a variation group",
                element.span,
            )),
            ElementKind::RootAggregate | ElementKind::Enum => self.diagnostics.push(
                CompileError::misplaced(&element.name, "inside an aggregate", element.span),
            ),
        }
    }

    /// Items of a variation group hang off the owner directly; the group
    /// itself has no node and adds no path segment.
    fn add_variation_group(
        &mut self,
        owner: NodeId,
        owner_path: &TreePath,
        container: &Element,
        facts: &ElementFacts,
    ) {
        let group = container.name.as_str();
        let mut tags = HashSet::new();
        let mut items = 0;

        for item in &container.children {
            let item_facts = self.resolve(item, false);
            if item_facts.kind != ElementKind::VariationItem {
                self.diagnostics
                    .push(CompileError::not_a_variation_item(&item.name, group, item.span));
                continue;
            }
            let key = item_facts.variation_key.clone().unwrap_or_default();
            if key.parse::<i64>().is_err() {
                self.diagnostics.push(CompileError::invalid_flag_value(
                    &item.name,
                    "variation-item",
                    &key,
                    item.span,
                ));
            } else if !tags.insert(key.clone()) {
                self.diagnostics
                    .push(CompileError::duplicate_variation_key(group, &key, item.span));
            }
            items += 1;

            let attrs = EdgeAttrs::child()
                .variation(group, key)
                .primary(facts.is_key)
                .required(facts.is_required);
            let path = owner_path.child(&item.name);
            self.add_aggregate(item, &item_facts, path, Some((owner, attrs)));
        }

        if items == 0 {
            self.diagnostics
                .push(CompileError::empty_variation_group(group, container.span));
        }
    }

    // ==================== Members ====================

    fn add_scalar(&mut self, owner: NodeId, owner_path: &TreePath, element: &Element, facts: &ElementFacts) {
        let path = owner_path.child(&element.name);
        if !element.children.is_empty() {
            self.diagnostics
                .push(CompileError::scalar_with_children(&element.name, element.span));
        }
        if self.paths.contains_key(&path) {
            self.diagnostics
                .push(CompileError::duplicate_path(&path, element.span));
            return;
        }
        let Some(type_name) = &facts.member_type else {
            self.diagnostics
                .push(CompileError::missing_member_type(&element.name, element.span));
            return;
        };
        let Some(member_type) = self.types.get(type_name) else {
            self.diagnostics.push(CompileError::unknown_member_type(
                &element.name,
                type_name,
                element.span,
            ));
            return;
        };

        let mut options = MemberOptions::new(&element.name, member_type);
        options.display_name = element.attr(DISPLAY_NAME_ATTRIBUTE).map(str::to_string);
        options.db_name = element.attr(DB_NAME_ATTRIBUTE).map(str::to_string);
        options.is_key = facts.is_key;
        options.is_display_name = facts.is_display_name;
        options.is_name_like = facts.is_name_like;
        options.is_required = facts.is_required || facts.is_key;
        options.invisible_in_gui = facts.invisible;
        options.read_only = facts.read_only;
        options.width = facts.width;
        options.enum_presentation = facts.enum_presentation;

        let id = self.graph.add_node(SchemaNode::Scalar(ScalarMember {
            path: path.clone(),
            options,
        }));
        tracing::debug!(path = %path, node = %id, member_type = %type_name, "scalar member");
        self.paths.insert(path, id);
        let order = self.next_order();
        self.add_edge(owner, id, &element.name, EdgeAttrs::having().order(order));
    }

    fn queue_reference(&mut self, owner: NodeId, element: &Element, facts: &ElementFacts) {
        for child in &element.children {
            self.diagnostics
                .push(CompileError::misplaced(&child.name, "inside a reference", child.span));
        }
        let order = self.next_order();
        let attrs = EdgeAttrs::reference()
            .primary(facts.is_key)
            .required(facts.is_required)
            .instance_name(facts.is_display_name)
            .name_like(facts.is_name_like)
            .invisible(facts.invisible)
            .order(order);
        self.pending_refs.push(PendingRelation {
            owner,
            element: element.name.clone(),
            target: facts.ref_target.clone().unwrap_or_default(),
            attrs,
            span: element.span,
        });
    }

    // ==================== Linking ====================

    /// Aggregate declared at the path written as `text`.
    fn aggregate_at(&self, text: &str) -> Option<NodeId> {
        let path = TreePath::parse(text)?;
        let id = *self.paths.get(&path)?;
        matches!(self.graph.get_node(id), Some(SchemaNode::Aggregate(_))).then_some(id)
    }

    fn link_references(&mut self) {
        for pending in std::mem::take(&mut self.pending_refs) {
            match self.aggregate_at(&pending.target) {
                Some(target) => self.add_edge(pending.owner, target, &pending.element, pending.attrs),
                None => self.diagnostics.push(CompileError::unknown_ref_target(
                    &pending.element,
                    &pending.target,
                    pending.span,
                )),
            }
        }
    }

    fn link_dependencies(&mut self) {
        for pending in std::mem::take(&mut self.pending_dependencies) {
            let is_root = TreePath::parse(&pending.target).is_some_and(|p| p.is_top_level());
            let target = self.aggregate_at(&pending.target).filter(|_| is_root);
            match target {
                Some(target) => self.add_edge(pending.owner, target, &pending.target, pending.attrs),
                None => self.diagnostics.push(CompileError::unknown_dependency(
                    &pending.element,
                    &pending.target,
                    pending.span,
                )),
            }
        }
    }

    /// One enumeration per variation group, listing its tags.
    fn register_variation_enums(&mut self) {
        let mut definitions = Vec::new();
        for id in self.paths.values() {
            let Ok(node) = self.graph.node(*id) else {
                continue;
            };
            if !matches!(node.item(), SchemaNode::Aggregate(_)) {
                continue;
            }
            let aggregate = AggregateNode::from_node(node);
            definitions.extend(aggregate.variation_groups().iter().map(|g| g.enum_definition()));
        }
        for definition in definitions {
            tracing::debug!(name = %definition.name, "variation enum");
            if let Err(e) = self.types.register_enum(definition) {
                self.diagnostics.push(e.into());
            }
        }
    }

    // ==================== Enums & Settings ====================

    fn declare_enum(&mut self, element: &Element) {
        let mut decls = Vec::new();
        for item in &element.children {
            let value = match item.attr(KEY_ATTRIBUTE) {
                None => None,
                Some(text) => match text.trim().parse::<i64>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        self.diagnostics.push(CompileError::invalid_enum_value(
                            &element.name,
                            &item.name,
                            text,
                            item.span,
                        ));
                        continue;
                    }
                },
            };
            let mut decl = EnumItemDecl::new(&item.name, value);
            if let Some(display_name) = item.attr(DISPLAY_NAME_ATTRIBUTE) {
                decl = decl.with_display_name(display_name);
            }
            decls.push(decl);
        }

        match EnumDefinition::try_new(&element.name, decls, EnumOrigin::Declared) {
            Ok(definition) => {
                tracing::debug!(name = %definition.name, items = definition.items.len(), "enum");
                if let Err(e) = self.types.register_enum(definition) {
                    self.diagnostics.push(e.into());
                }
            }
            Err(errors) => self
                .diagnostics
                .extend(errors.into_iter().map(CompileError::from)),
        }
    }

    fn read_config(&mut self, element: &Element) {
        for attribute in &element.attributes {
            if attribute.name == ROOT_NAMESPACE {
                if is_namespace(&attribute.value) {
                    self.schema_config.root_namespace = Some(attribute.value.clone());
                } else {
                    self.diagnostics.push(CompileError::invalid_config(
                        &attribute.name,
                        &attribute.value,
                        attribute.span,
                    ));
                }
            } else {
                self.schema_config
                    .extra
                    .insert(attribute.name.clone(), attribute.value.clone());
            }
        }
        for child in &element.children {
            self.diagnostics.push(CompileError::misplaced(
                &child.name,
                "inside the configuration section",
                child.span,
            ));
        }
    }
}

fn is_namespace(text: &str) -> bool {
    static NAMESPACE: OnceLock<Option<Regex>> = OnceLock::new();
    NAMESPACE
        .get_or_init(|| Regex::new(NAMESPACE_PATTERN).ok())
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_pattern() {
        assert!(is_namespace("Shop"));
        assert!(is_namespace("Acme.Shop.Orders"));
        assert!(!is_namespace("Acme..Shop"));
        assert!(!is_namespace("1Shop"));
        assert!(!is_namespace("Acme Shop"));
    }
}
